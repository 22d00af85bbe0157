//! HTTP handlers for partner endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::adapters::http::dto::{
    parse_id, BookingResponseRequest, FeatureRequestRequest, PartnerProfileRequest,
    PropertyRequest, StatusFilter, WithNotice,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::inbox::InboxHandlers;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::account::UpdatePartnerProfileHandler;
use crate::application::handlers::booking::{
    ListBookingsHandler, RespondToBookingCommand, RespondToBookingHandler,
};
use crate::application::handlers::commission::PartnerRevenueReportHandler;
use crate::application::handlers::feature_request::{
    ListFeatureRequestsHandler, SubmitFeatureRequestCommand, SubmitFeatureRequestHandler,
};
use crate::application::handlers::property::{
    CreatePropertyHandler, ListPropertiesHandler, ListPropertiesQuery, UpdatePropertyCommand,
    UpdatePropertyHandler,
};
use crate::application::handlers::session::AccessGuard;
use crate::domain::booking::BookingStatus;
use crate::domain::property::Viewer;
use crate::domain::session::Role;

#[derive(Clone)]
pub struct PartnerHandlers {
    guard: AccessGuard,
    update_profile: Arc<UpdatePartnerProfileHandler>,
    list_properties: Arc<ListPropertiesHandler>,
    create_property: Arc<CreatePropertyHandler>,
    update_property: Arc<UpdatePropertyHandler>,
    feature_requests: Arc<ListFeatureRequestsHandler>,
    submit_feature: Arc<SubmitFeatureRequestHandler>,
    bookings: Arc<ListBookingsHandler>,
    respond: Arc<RespondToBookingHandler>,
    revenue: Arc<PartnerRevenueReportHandler>,
    pub(super) inbox: InboxHandlers,
}

impl PartnerHandlers {
    pub fn new(w: &Workflows) -> Self {
        let r = &w.repos;
        let g = &w.guard;
        Self {
            guard: g.clone(),
            update_profile: Arc::new(UpdatePartnerProfileHandler::new(
                g.clone(),
                r.partners.clone(),
                w.in_flight.clone(),
            )),
            list_properties: Arc::new(ListPropertiesHandler::new(r.properties.clone())),
            create_property: Arc::new(CreatePropertyHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            update_property: Arc::new(UpdatePropertyHandler::new(
                g.clone(),
                r.properties.clone(),
                w.in_flight.clone(),
            )),
            feature_requests: Arc::new(ListFeatureRequestsHandler::new(
                g.clone(),
                r.feature_requests.clone(),
            )),
            submit_feature: Arc::new(SubmitFeatureRequestHandler::new(
                g.clone(),
                r.properties.clone(),
                r.feature_requests.clone(),
                w.in_flight.clone(),
            )),
            bookings: Arc::new(ListBookingsHandler::new(g.clone(), r.bookings.clone())),
            respond: Arc::new(RespondToBookingHandler::new(
                g.clone(),
                r.bookings.clone(),
                r.links.clone(),
                r.agents.clone(),
                r.commissions.clone(),
                w.settings.commission,
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            revenue: Arc::new(PartnerRevenueReportHandler::new(
                g.clone(),
                r.bookings.clone(),
                w.settings.commission,
            )),
            inbox: InboxHandlers::new(w, Role::Partner),
        }
    }
}

/// GET /api/partner/profile
pub async fn get_profile(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.guard.require_active_partner(&user).await?))
}

/// PUT /api/partner/profile
pub async fn update_profile(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PartnerProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.update_profile.handle(&user, req.into()).await?))
}

/// GET /api/partner/properties - own listings, inactive included
pub async fn list_properties(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let partner = h.guard.require_active_partner(&user).await?;
    let listed = h
        .list_properties
        .handle(Viewer::Partner(partner.id), ListPropertiesQuery::default())
        .await?;
    Ok(Json(listed))
}

/// POST /api/partner/properties
pub async fn create_property(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let property = h.create_property.handle(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// PUT /api/partner/properties/:id
pub async fn update_property(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdatePropertyCommand {
        property_id: parse_id(&id, "property")?,
        details: req.into(),
    };
    Ok(Json(h.update_property.handle(&user, cmd).await?))
}

/// GET /api/partner/feature-requests
pub async fn list_feature_requests(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.feature_requests.own(&user).await?))
}

/// POST /api/partner/feature-requests
pub async fn submit_feature_request(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<FeatureRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SubmitFeatureRequestCommand {
        property_id: req.property_id,
        duration_days: req.duration_days,
        payment_method: req.payment_method,
        remarks: req.remarks,
    };
    let request = h.submit_feature.handle(&user, cmd).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/partner/bookings?status=
pub async fn list_bookings(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse(BookingStatus::parse)?;
    Ok(Json(h.bookings.own(&user, status).await?))
}

/// POST /api/partner/bookings/:id/respond - confirm or decline
pub async fn respond_to_booking(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<BookingResponseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RespondToBookingCommand {
        booking_id: parse_id(&id, "booking")?,
        response: req.response,
    };
    let result = h.respond.handle(&user, cmd).await?;
    if let Some(commission) = &result.commission {
        tracing::debug!(commission_id = %commission.id, "Commission recorded on confirmation");
    }
    Ok(Json(WithNotice::new(result.booking, result.notification_error)))
}

/// GET /api/partner/revenue
pub async fn revenue_report(
    State(h): State<PartnerHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.revenue.handle(&user).await?))
}
