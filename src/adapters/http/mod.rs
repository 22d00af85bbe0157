//! HTTP adapters - REST API over the application handlers.
//!
//! Five areas, each with its own handler bundle:
//!
//! - `/api/session` - Landing decision, account status, registration
//! - `/api/admin` - Approvals, listing control, queues
//! - `/api/partner` - Listings, bookings, revenue, inbox
//! - `/api/agent` - Earnings, commissions, inbox
//! - `/api/public` - Guest browsing, booking requests, reviews

pub mod admin;
pub mod agent;
pub mod dto;
pub mod error;
pub mod inbox;
pub mod middleware;
pub mod partner;
pub mod public;
pub mod session;
pub mod state;

use std::time::Duration;

use axum::{http::HeaderValue, middleware::from_fn_with_state, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use error::{ApiError, ErrorResponse};
pub use middleware::AuthState;
pub use state::{AppState, Repositories, ServiceSettings};

/// Cross-cutting settings for the outer layers.
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// Should outlast the longest account-status wait.
    pub request_timeout: Duration,
    /// Allowed browser origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(90),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the full API router.
///
/// The auth middleware runs on every route; it attaches the principal when a
/// valid bearer token is present and leaves anonymous requests alone, so the
/// public area stays open while the other areas demand a principal through
/// their extractors.
pub fn api_router(state: AppState, validator: AuthState, options: &ApiOptions) -> Router {
    Router::new()
        .nest("/api/session", session::session_routes(state.session))
        .nest("/api/admin", admin::admin_routes(state.admin))
        .nest("/api/partner", partner::partner_routes(state.partner))
        .nest("/api/agent", agent::agent_routes(state.agent))
        .nest("/api/public", public::public_routes(state.public))
        .layer(from_fn_with_state(validator, middleware::auth_middleware))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(&options.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}
