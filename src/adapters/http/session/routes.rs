//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    account_status, register_agent, register_partner, resolve_session, SessionHandlers,
};

pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", get(resolve_session))
        .route("/status", get(account_status))
        .route("/register/partner", post(register_partner))
        .route("/register/agent", post(register_agent))
        .with_state(handlers)
}
