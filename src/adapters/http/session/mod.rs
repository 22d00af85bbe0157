//! HTTP adapter for session endpoints.
//!
//! - `GET /api/session` - Resolve the caller's landing decision
//! - `GET /api/session/status` - Long-poll a pending account's status
//! - `POST /api/session/register/partner` - Sign up as a partner
//! - `POST /api/session/register/agent` - Sign up as a referral agent

mod handlers;
mod routes;

pub use handlers::SessionHandlers;
pub use routes::session_routes;
