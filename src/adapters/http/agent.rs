//! HTTP adapter for referral agent endpoints.
//!
//! - `GET /api/agent/profile` - Own account, including the referral code
//! - `PUT /api/agent/payout` - Replace payout details
//! - `GET /api/agent/earnings` - Referral and commission summary
//! - `GET /api/agent/commissions` - Own commission records
//! - notification and ticket routes from the shared inbox

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use crate::adapters::http::dto::PayoutDetailsRequest;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::inbox::{inbox_routes, InboxHandlers};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::account::UpdatePayoutDetailsHandler;
use crate::application::handlers::commission::{
    AgentEarningsReportHandler, ListCommissionsHandler,
};
use crate::application::handlers::session::AccessGuard;
use crate::domain::session::Role;

#[derive(Clone)]
pub struct AgentHandlers {
    guard: AccessGuard,
    update_payout: Arc<UpdatePayoutDetailsHandler>,
    earnings: Arc<AgentEarningsReportHandler>,
    commissions: Arc<ListCommissionsHandler>,
    inbox: InboxHandlers,
}

impl AgentHandlers {
    pub fn new(w: &Workflows) -> Self {
        let r = &w.repos;
        Self {
            guard: w.guard.clone(),
            update_payout: Arc::new(UpdatePayoutDetailsHandler::new(
                w.guard.clone(),
                r.agents.clone(),
                w.in_flight.clone(),
            )),
            earnings: Arc::new(AgentEarningsReportHandler::new(
                w.guard.clone(),
                r.links.clone(),
                r.commissions.clone(),
            )),
            commissions: Arc::new(ListCommissionsHandler::new(
                w.guard.clone(),
                r.commissions.clone(),
            )),
            inbox: InboxHandlers::new(w, Role::ReferralAgent),
        }
    }
}

pub fn agent_routes(handlers: AgentHandlers) -> Router {
    let inbox = handlers.inbox.clone();
    Router::new()
        .route("/profile", get(get_profile))
        .route("/payout", put(update_payout))
        .route("/earnings", get(earnings_report))
        .route("/commissions", get(list_commissions))
        .with_state(handlers)
        .merge(inbox_routes(inbox))
}

async fn get_profile(
    State(h): State<AgentHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.guard.require_active_agent(&user).await?))
}

async fn update_payout(
    State(h): State<AgentHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PayoutDetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.update_payout.handle(&user, req.payout_details).await?))
}

async fn earnings_report(
    State(h): State<AgentHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.earnings.handle(&user).await?))
}

async fn list_commissions(
    State(h): State<AgentHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.commissions.own(&user).await?))
}
