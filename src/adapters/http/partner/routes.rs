//! Route configuration for partner endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use crate::adapters::http::inbox::inbox_routes;

use super::handlers::*;

/// Creates the partner router.
///
/// Routes (under `/api/partner`):
/// - `GET /profile`, `PUT /profile`
/// - `GET /properties`, `POST /properties`, `PUT /properties/:id`
/// - `GET /feature-requests`, `POST /feature-requests`
/// - `GET /bookings?status=`, `POST /bookings/:id/respond`
/// - `GET /revenue`
/// - notification and ticket routes from the shared inbox
pub fn partner_routes(handlers: PartnerHandlers) -> Router {
    let inbox = handlers.inbox.clone();
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/properties", get(list_properties).post(create_property))
        .route("/properties/:id", put(update_property))
        .route(
            "/feature-requests",
            get(list_feature_requests).post(submit_feature_request),
        )
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id/respond", post(respond_to_booking))
        .route("/revenue", get(revenue_report))
        .with_state(handlers)
        .merge(inbox_routes(inbox))
}
