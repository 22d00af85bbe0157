//! Session resolution and the shared access guard.

mod access_guard;
mod resolve_session;
mod status_poller;

pub use access_guard::AccessGuard;
pub use resolve_session::{ResolveSessionHandler, SessionResolution};
pub use status_poller::{PendingStatusPoller, StatusPollHandle};
