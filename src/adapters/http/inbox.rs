//! Notification and support-ticket endpoints shared by partners and agents.
//!
//! The same routes are mounted under both `/api/partner` and `/api/agent`;
//! each mount acts as its own role, so a principal holding both roles sees
//! two separate inboxes.
//!
//! - `GET /notifications?unread_only=` - Newest first
//! - `POST /notifications/:id/read` - Mark one read
//! - `GET /tickets` - Own tickets
//! - `POST /tickets` - Open a ticket

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::adapters::http::dto::{parse_id, NotificationFilter, TicketRequest};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::notification::{
    ListNotificationsHandler, MarkNotificationReadHandler,
};
use crate::application::handlers::support::{
    ListTicketsHandler, OpenTicketCommand, OpenTicketHandler,
};
use crate::domain::session::Role;

#[derive(Clone)]
pub struct InboxHandlers {
    role: Role,
    notifications: Arc<ListNotificationsHandler>,
    mark_read: Arc<MarkNotificationReadHandler>,
    tickets: Arc<ListTicketsHandler>,
    open_ticket: Arc<OpenTicketHandler>,
}

impl InboxHandlers {
    pub fn new(w: &Workflows, role: Role) -> Self {
        let r = &w.repos;
        Self {
            role,
            notifications: Arc::new(ListNotificationsHandler::new(
                w.guard.clone(),
                r.notifications.clone(),
            )),
            mark_read: Arc::new(MarkNotificationReadHandler::new(
                w.guard.clone(),
                r.notifications.clone(),
            )),
            tickets: Arc::new(ListTicketsHandler::new(w.guard.clone(), r.tickets.clone())),
            open_ticket: Arc::new(OpenTicketHandler::new(
                w.guard.clone(),
                r.tickets.clone(),
                w.in_flight.clone(),
            )),
        }
    }
}

pub fn inbox_routes(handlers: InboxHandlers) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/read", post(mark_notification_read))
        .route("/tickets", get(list_tickets).post(open_ticket))
        .with_state(handlers)
}

async fn list_notifications(
    State(h): State<InboxHandlers>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<NotificationFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let listed = h
        .notifications
        .handle(&user, h.role, filter.unread_only)
        .await?;
    Ok(Json(listed))
}

async fn mark_notification_read(
    State(h): State<InboxHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "notification")?;
    Ok(Json(h.mark_read.handle(&user, h.role, id).await?))
}

async fn list_tickets(
    State(h): State<InboxHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(h.tickets.own(&user, h.role).await?))
}

async fn open_ticket(
    State(h): State<InboxHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<TicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = OpenTicketCommand {
        subject: req.subject,
        message: req.message,
    };
    let ticket = h.open_ticket.handle(&user, h.role, cmd).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
