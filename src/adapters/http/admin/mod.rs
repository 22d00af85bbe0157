//! HTTP adapter for administrator endpoints.
//!
//! Every handler here starts with the administrator gate; a caller without
//! the role gets `403 FORBIDDEN`.

mod handlers;
mod routes;

pub use handlers::AdminHandlers;
pub use routes::admin_routes;
