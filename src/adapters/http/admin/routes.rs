//! Route configuration for administrator endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::*;

/// Creates the admin router.
///
/// Routes (under `/api/admin`):
/// - `GET /partners`, `POST /partners/:id/review`
/// - `GET /agents`, `POST /agents/:id/review`
/// - `GET /properties`, `POST /properties/:id/active`
/// - `POST /properties/:id/feature`, `POST /properties/:id/feature/extend`,
///   `DELETE /properties/:id/feature`
/// - `GET /feature-requests`, `POST /feature-requests/:id/approve`,
///   `POST /feature-requests/:id/reject`
/// - `GET /bookings`
/// - `GET /commissions`, `POST /commissions/:id/status`
/// - `GET /tickets`, `POST /tickets/:id`
/// - `GET /reviews`, `POST /reviews/:id/moderate`
pub fn admin_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route("/partners", get(list_partners))
        .route("/partners/:id/review", post(review_partner))
        .route("/agents", get(list_agents))
        .route("/agents/:id/review", post(review_agent))
        .route("/properties", get(list_properties))
        .route("/properties/:id/active", post(set_property_active))
        .route(
            "/properties/:id/feature",
            post(force_feature).delete(clear_feature),
        )
        .route("/properties/:id/feature/extend", post(extend_feature))
        .route("/feature-requests", get(list_feature_requests))
        .route("/feature-requests/:id/approve", post(approve_feature_request))
        .route("/feature-requests/:id/reject", post(reject_feature_request))
        .route("/bookings", get(list_bookings))
        .route("/commissions", get(list_commissions))
        .route("/commissions/:id/status", post(update_commission_status))
        .route("/tickets", get(list_tickets))
        .route("/tickets/:id", post(advance_ticket))
        .route("/reviews", get(list_reviews))
        .route("/reviews/:id/moderate", post(moderate_review))
        .with_state(handlers)
}
