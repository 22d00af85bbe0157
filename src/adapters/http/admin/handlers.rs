//! HTTP handlers for administrator endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::adapters::http::dto::{
    parse_id, ActiveRequest, CommissionStatusRequest, DaysRequest, DecisionRequest,
    ModerationRequest, StatusFilter, TicketUpdateRequest, WithNotice,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::account::{
    ListAccountsQuery, ListAgentsHandler, ListPartnersHandler, ReviewAgentCommand,
    ReviewAgentHandler, ReviewPartnerCommand, ReviewPartnerHandler,
};
use crate::application::handlers::booking::ListBookingsHandler;
use crate::application::handlers::commission::{
    ListCommissionsHandler, UpdateCommissionStatusCommand, UpdateCommissionStatusHandler,
};
use crate::application::handlers::feature_request::{
    ApproveFeatureRequestHandler, ListFeatureRequestsHandler, RejectFeatureRequestHandler,
};
use crate::application::handlers::property::{
    ClearFeatureHandler, ExtendFeatureHandler, FeatureCommand, ForceFeatureHandler,
    ListPropertiesHandler, ListPropertiesQuery, SetPropertyActiveCommand,
    SetPropertyActiveHandler,
};
use crate::application::handlers::session::AccessGuard;
use crate::application::handlers::support::{
    AdvanceTicketCommand, AdvanceTicketHandler, ListReviewsHandler, ListTicketsHandler,
    ModerateReviewCommand, ModerateReviewHandler,
};
use crate::domain::account::AccountStatus;
use crate::domain::booking::BookingStatus;
use crate::domain::commission::CommissionStatus;
use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::property::{Property, Viewer};
use crate::domain::support::{ReviewStatus, TicketStatus};

#[derive(Clone)]
pub struct AdminHandlers {
    guard: AccessGuard,
    list_partners: Arc<ListPartnersHandler>,
    list_agents: Arc<ListAgentsHandler>,
    review_partner: Arc<ReviewPartnerHandler>,
    review_agent: Arc<ReviewAgentHandler>,
    list_properties: Arc<ListPropertiesHandler>,
    set_active: Arc<SetPropertyActiveHandler>,
    force_feature: Arc<ForceFeatureHandler>,
    extend_feature: Arc<ExtendFeatureHandler>,
    clear_feature: Arc<ClearFeatureHandler>,
    feature_requests: Arc<ListFeatureRequestsHandler>,
    approve_feature: Arc<ApproveFeatureRequestHandler>,
    reject_feature: Arc<RejectFeatureRequestHandler>,
    bookings: Arc<ListBookingsHandler>,
    commissions: Arc<ListCommissionsHandler>,
    update_commission: Arc<UpdateCommissionStatusHandler>,
    tickets: Arc<ListTicketsHandler>,
    advance_ticket: Arc<AdvanceTicketHandler>,
    reviews: Arc<ListReviewsHandler>,
    moderate_review: Arc<ModerateReviewHandler>,
}

impl AdminHandlers {
    pub fn new(w: &Workflows) -> Self {
        let r = &w.repos;
        let g = &w.guard;
        Self {
            guard: g.clone(),
            list_partners: Arc::new(ListPartnersHandler::new(g.clone(), r.partners.clone())),
            list_agents: Arc::new(ListAgentsHandler::new(g.clone(), r.agents.clone())),
            review_partner: Arc::new(ReviewPartnerHandler::new(
                g.clone(),
                r.partners.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            review_agent: Arc::new(ReviewAgentHandler::new(
                g.clone(),
                r.agents.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            list_properties: Arc::new(ListPropertiesHandler::new(r.properties.clone())),
            set_active: Arc::new(SetPropertyActiveHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            force_feature: Arc::new(ForceFeatureHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            extend_feature: Arc::new(ExtendFeatureHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            clear_feature: Arc::new(ClearFeatureHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            feature_requests: Arc::new(ListFeatureRequestsHandler::new(
                g.clone(),
                r.feature_requests.clone(),
            )),
            approve_feature: Arc::new(ApproveFeatureRequestHandler::new(
                g.clone(),
                r.feature_requests.clone(),
                r.properties.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            reject_feature: Arc::new(RejectFeatureRequestHandler::new(
                g.clone(),
                r.feature_requests.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            bookings: Arc::new(ListBookingsHandler::new(g.clone(), r.bookings.clone())),
            commissions: Arc::new(ListCommissionsHandler::new(g.clone(), r.commissions.clone())),
            update_commission: Arc::new(UpdateCommissionStatusHandler::new(
                g.clone(),
                r.commissions.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            tickets: Arc::new(ListTicketsHandler::new(g.clone(), r.tickets.clone())),
            advance_ticket: Arc::new(AdvanceTicketHandler::new(
                g.clone(),
                r.tickets.clone(),
                w.in_flight.clone(),
            )),
            reviews: Arc::new(ListReviewsHandler::new(g.clone(), r.reviews.clone())),
            moderate_review: Arc::new(ModerateReviewHandler::new(
                g.clone(),
                r.reviews.clone(),
                w.in_flight.clone(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovedFeature {
    pub request: FeatureRequest,
    pub property: Property,
}

// ════════════════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/partners?status=
pub async fn list_partners(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListAccountsQuery {
        status: filter.parse(AccountStatus::parse)?,
    };
    Ok(Json(h.list_partners.handle(&user, query).await?))
}

/// GET /api/admin/agents?status=
pub async fn list_agents(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListAccountsQuery {
        status: filter.parse(AccountStatus::parse)?,
    };
    Ok(Json(h.list_agents.handle(&user, query).await?))
}

/// POST /api/admin/partners/:id/review
pub async fn review_partner(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ReviewPartnerCommand {
        partner_id: parse_id(&id, "partner")?,
        decision: req.decision,
    };
    let result = h.review_partner.handle(&user, cmd).await?;
    Ok(Json(WithNotice::new(result.partner, result.notification_error)))
}

/// POST /api/admin/agents/:id/review
pub async fn review_agent(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ReviewAgentCommand {
        agent_id: parse_id(&id, "agent")?,
        decision: req.decision,
    };
    let result = h.review_agent.handle(&user, cmd).await?;
    Ok(Json(WithNotice::new(result.agent, result.notification_error)))
}

// ════════════════════════════════════════════════════════════════════════════
// Properties
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/properties - every listing, inactive included
pub async fn list_properties(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    h.guard.require_admin(&user).await?;
    let listed = h
        .list_properties
        .handle(Viewer::Administrator, ListPropertiesQuery::default())
        .await?;
    Ok(Json(listed))
}

/// POST /api/admin/properties/:id/active
pub async fn set_property_active(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<ActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SetPropertyActiveCommand {
        property_id: parse_id(&id, "property")?,
        active: req.active,
    };
    Ok(Json(h.set_active.handle(&user, cmd).await?))
}

/// POST /api/admin/properties/:id/feature - feature from now for `days`
pub async fn force_feature(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<DaysRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = FeatureCommand {
        property_id: parse_id(&id, "property")?,
        days: req.days,
    };
    Ok(Json(h.force_feature.handle(&user, cmd).await?))
}

/// POST /api/admin/properties/:id/feature/extend - push the end out by `days`
pub async fn extend_feature(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<DaysRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = FeatureCommand {
        property_id: parse_id(&id, "property")?,
        days: req.days,
    };
    Ok(Json(h.extend_feature.handle(&user, cmd).await?))
}

/// DELETE /api/admin/properties/:id/feature
pub async fn clear_feature(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let property_id = parse_id(&id, "property")?;
    Ok(Json(h.clear_feature.handle(&user, property_id).await?))
}

// ════════════════════════════════════════════════════════════════════════════
// Feature requests
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/feature-requests?status=
pub async fn list_feature_requests(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(FeatureRequestStatus::parse)?;
    Ok(Json(h.feature_requests.all(&user, status).await?))
}

/// POST /api/admin/feature-requests/:id/approve
pub async fn approve_feature_request(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = parse_id(&id, "feature request")?;
    let result = h.approve_feature.handle(&user, request_id).await?;
    let approved = ApprovedFeature {
        request: result.request,
        property: result.property,
    };
    Ok(Json(WithNotice::new(approved, result.notification_error)))
}

/// POST /api/admin/feature-requests/:id/reject
pub async fn reject_feature_request(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = parse_id(&id, "feature request")?;
    let result = h.reject_feature.handle(&user, request_id).await?;
    Ok(Json(WithNotice::new(result.request, result.notification_error)))
}

// ════════════════════════════════════════════════════════════════════════════
// Bookings and commissions
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/bookings?status=
pub async fn list_bookings(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(BookingStatus::parse)?;
    Ok(Json(h.bookings.all(&user, status).await?))
}

/// GET /api/admin/commissions?status=
pub async fn list_commissions(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(CommissionStatus::parse)?;
    Ok(Json(h.commissions.all(&user, status).await?))
}

/// POST /api/admin/commissions/:id/status
pub async fn update_commission_status(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<CommissionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateCommissionStatusCommand {
        commission_id: parse_id(&id, "commission")?,
        status: req.status,
    };
    let result = h.update_commission.handle(&user, cmd).await?;
    Ok(Json(WithNotice::new(result.commission, result.notification_error)))
}

// ════════════════════════════════════════════════════════════════════════════
// Support and reviews
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/tickets?status=
pub async fn list_tickets(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(TicketStatus::parse)?;
    Ok(Json(h.tickets.all(&user, status).await?))
}

/// POST /api/admin/tickets/:id - move a ticket along, optionally answering it
pub async fn advance_ticket(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<TicketUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AdvanceTicketCommand {
        ticket_id: parse_id(&id, "ticket")?,
        status: req.status,
        response: req.response,
    };
    Ok(Json(h.advance_ticket.handle(&user, cmd).await?))
}

/// GET /api/admin/reviews?status=
pub async fn list_reviews(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(ReviewStatus::parse)?;
    Ok(Json(h.reviews.all(&user, status).await?))
}

/// POST /api/admin/reviews/:id/moderate
pub async fn moderate_review(
    State(h): State<AdminHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<ModerationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ModerateReviewCommand {
        review_id: parse_id(&id, "review")?,
        status: req.status,
    };
    Ok(Json(h.moderate_review.handle(&user, cmd).await?))
}
