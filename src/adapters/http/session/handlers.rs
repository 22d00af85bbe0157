//! HTTP handlers for session endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::time;

use crate::adapters::http::dto::{RegisterAgentRequest, RegisterPartnerRequest};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::account::{
    RegisterAgentCommand, RegisterAgentHandler, RegisterPartnerCommand, RegisterPartnerHandler,
};
use crate::application::handlers::session::{PendingStatusPoller, ResolveSessionHandler};
use crate::application::WorkflowError;
use crate::domain::account::AccountStatus;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::session::{AccountLookup, Role};
use crate::ports::{AgentRepository, PartnerRepository, SessionTerminator};

/// Longest a status request may hold the connection open.
const MAX_STATUS_WAIT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct SessionHandlers {
    resolve: Arc<ResolveSessionHandler>,
    register_partner: Arc<RegisterPartnerHandler>,
    register_agent: Arc<RegisterAgentHandler>,
    poller: PendingStatusPoller,
    partners: Arc<dyn PartnerRepository>,
    agents: Arc<dyn AgentRepository>,
}

impl SessionHandlers {
    pub fn new(w: &Workflows, terminator: Arc<dyn SessionTerminator>) -> Self {
        let r = &w.repos;
        Self {
            resolve: Arc::new(ResolveSessionHandler::new(
                r.roles.clone(),
                r.partners.clone(),
                r.agents.clone(),
                terminator,
            )),
            register_partner: Arc::new(RegisterPartnerHandler::new(
                r.partners.clone(),
                r.agents.clone(),
                r.links.clone(),
                r.roles.clone(),
                w.in_flight.clone(),
            )),
            register_agent: Arc::new(RegisterAgentHandler::new(
                r.agents.clone(),
                r.roles.clone(),
                w.in_flight.clone(),
            )),
            poller: PendingStatusPoller::new(
                r.partners.clone(),
                r.agents.clone(),
                w.settings.status_poll_interval,
            ),
            partners: r.partners.clone(),
            agents: r.agents.clone(),
        }
    }

    async fn read_status(&self, role: Role, user: &AuthenticatedUser) -> AccountLookup {
        let found = match role {
            Role::Partner => self
                .partners
                .find_by_user_id(&user.id)
                .await
                .map(|p| p.map(|p| p.status)),
            Role::ReferralAgent => self
                .agents
                .find_by_user_id(&user.id)
                .await
                .map(|a| a.map(|a| a.status)),
            Role::Administrator => Ok(None),
        };
        match found {
            Ok(Some(status)) => AccountLookup::Found(status),
            Ok(None) => AccountLookup::Missing,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Account status read failed");
                AccountLookup::Failed
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub role: String,
    /// Seconds to wait for a pending account to change. Zero answers at once.
    #[serde(default)]
    pub wait_secs: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountStatusResponse {
    /// `found`, `missing` or `failed`.
    pub lookup: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

impl From<AccountLookup> for AccountStatusResponse {
    fn from(lookup: AccountLookup) -> Self {
        match lookup {
            AccountLookup::Found(status) => Self {
                lookup: "found",
                status: Some(status),
            },
            AccountLookup::Missing => Self {
                lookup: "missing",
                status: None,
            },
            AccountLookup::Failed => Self {
                lookup: "failed",
                status: None,
            },
        }
    }
}

/// GET /api/session - Decide where the caller lands; denials are signed out
pub async fn resolve_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let resolution = handlers.resolve.handle(&user).await;
    let status = if resolution.decision.is_granted() {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    (status, Json(resolution)).into_response()
}

/// GET /api/session/status - Current account status, optionally waiting for
/// a pending account to be decided
pub async fn account_status(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<StatusQuery>,
) -> Result<Json<AccountStatusResponse>, ApiError> {
    let role = Role::parse(&query.role)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown role '{}'", query.role)))?;

    let now = handlers.read_status(role, &user).await;
    let wait = Duration::from_secs(query.wait_secs).min(MAX_STATUS_WAIT);
    if now != AccountLookup::Found(AccountStatus::Pending) || wait.is_zero() {
        return Ok(Json(now.into()));
    }

    // The watch ends when this request does; dropping the handle stops it.
    let mut watch = handlers.poller.watch(role, user.id.clone());
    let settled = time::timeout(wait, async {
        while let Some(lookup) = watch.changed().await {
            if lookup != AccountLookup::Found(AccountStatus::Pending)
                && lookup != AccountLookup::Failed
            {
                return lookup;
            }
        }
        watch.current()
    })
    .await
    .unwrap_or(now);
    Ok(Json(settled.into()))
}

/// POST /api/session/register/partner - Create a pending partner account
pub async fn register_partner(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<RegisterPartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RegisterPartnerCommand {
        profile: req.profile.into(),
        referral_code: req.referral_code,
    };
    let result = handlers
        .register_partner
        .handle(&user, cmd)
        .await
        .map_err(log_registration_failure)?;
    Ok((StatusCode::CREATED, Json(result.partner)))
}

/// POST /api/session/register/agent - Create a pending referral agent account
pub async fn register_agent(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<RegisterAgentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RegisterAgentCommand {
        full_name: req.full_name,
        payout_details: req.payout_details,
    };
    let agent = handlers
        .register_agent
        .handle(&user, cmd)
        .await
        .map_err(log_registration_failure)?;
    Ok((StatusCode::CREATED, Json(agent)))
}

fn log_registration_failure(err: WorkflowError) -> ApiError {
    if matches!(err, WorkflowError::PartialFailure { .. }) {
        tracing::error!(error = %err, "Registration left partial state");
    }
    err.into()
}
