//! HTTP adapter for partner endpoints.
//!
//! Only an active partner gets through; pending, rejected and suspended
//! accounts receive `403 ACCESS_DENIED` with the denial reason.

mod handlers;
mod routes;

pub use handlers::PartnerHandlers;
pub use routes::partner_routes;
