//! Handlers for the `/tickets` resource.
//!
//! Submission is public (guests file tickets too); everything else
//! requires authentication, and mutating operations require staff.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::roles;
use helpdesk_core::ticket::{TicketPriority, TicketSource, TicketStatus};
use helpdesk_db::models::ticket::Attachment;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::tickets::NewTicket;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /tickets`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    /// Omit to infer the department from the ticket text.
    pub department: Option<String>,
    /// Omit to infer the priority from the ticket text.
    pub priority: Option<TicketPriority>,
    #[validate(email)]
    pub created_by: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub source: Option<TicketSource>,
}

/// Query parameters for `GET /tickets`. At most one filter applies, in the
/// order listed here.
#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub department: Option<String>,
    pub status: Option<TicketStatus>,
}

/// Body for `POST /tickets/{reference}/responses`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddResponseRequest {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    /// Staff-only: hide this response from the requester.
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Body for `POST /tickets/{reference}/notes`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddNoteRequest {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Body for `PUT /tickets/{reference}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TicketStatus,
}

/// Body for `PUT /tickets/{reference}/assignee`.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignRequest {
    #[validate(email)]
    pub assignee_email: String,
}

// ---------------------------------------------------------------------------
// Submission & queries
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
///
/// Create a ticket. Public: guests, students, and staff all submit here.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ticket = state
        .tickets
        .create_ticket(NewTicket {
            title: input.title,
            description: input.description,
            department: input.department,
            priority: input.priority,
            created_by: input.created_by,
            attachments: input.attachments,
            source: input.source.unwrap_or(TicketSource::Web),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": ticket })),
    ))
}

/// GET /api/v1/tickets
///
/// List tickets. Students always get their own tickets; staff may filter
/// by creator, assignee, department, or status (first match wins), or get
/// everything.
pub async fn list_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let tickets = if !roles::is_staff(&auth.role) {
        state.tickets.get_tickets_by_user(&auth.email).await?
    } else if let Some(created_by) = &params.created_by {
        state.tickets.get_tickets_by_user(created_by).await?
    } else if let Some(assigned_to) = &params.assigned_to {
        state.tickets.get_tickets_by_assignee(assigned_to).await?
    } else if let Some(department) = &params.department {
        state.tickets.get_tickets_by_department(department).await?
    } else if let Some(status) = params.status {
        state.tickets.get_tickets_by_status(status).await?
    } else {
        state.tickets.get_tickets().await?
    };

    Ok(Json(serde_json::json!({ "data": tickets })))
}

/// GET /api/v1/tickets/{reference}
///
/// Fetch one ticket with its thread. Students may only view their own
/// tickets, and staff-only content (internal responses, notes) is stripped
/// for them.
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let mut detail = state.tickets.get_ticket_detail(&reference).await?;

    if !roles::is_staff(&auth.role) {
        if detail.ticket.created_by != auth.email {
            return Err(AppError::Core(CoreError::Forbidden(
                "You may only view your own tickets".into(),
            )));
        }
        detail.responses.retain(|r| !r.is_internal);
        detail.internal_notes.clear();
    }

    Ok(Json(serde_json::json!({ "data": detail })))
}

/// GET /api/v1/tickets/stats
///
/// Aggregate ticket counts for dashboards.
pub async fn stats(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = state.tickets.stats().await?;
    Ok(Json(serde_json::json!({ "data": stats })))
}

// ---------------------------------------------------------------------------
// Thread
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets/{reference}/responses
///
/// Append a response to the ticket's thread. Internal responses require a
/// staff role. Closed tickets reject public responses with 409.
pub async fn add_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<AddResponseRequest>,
) -> AppResult<Json<serde_json::Value>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if input.is_internal && !roles::is_staff(&auth.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Internal responses require a staff role".into(),
        )));
    }

    let ticket = state
        .tickets
        .add_response(
            &reference,
            &auth.email,
            &input.message,
            input.is_internal,
            &input.attachments,
        )
        .await?;

    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// POST /api/v1/tickets/{reference}/notes
///
/// Append a staff-only note to the ticket's audit trail.
pub async fn add_note(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<AddNoteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let note = state
        .tickets
        .add_internal_note(&reference, &user.email, &input.message)
        .await?;

    Ok(Json(serde_json::json!({ "data": note })))
}

// ---------------------------------------------------------------------------
// Status & assignment
// ---------------------------------------------------------------------------

/// PUT /api/v1/tickets/{reference}/status
pub async fn change_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let ticket = state
        .tickets
        .change_status(&reference, input.status, &user.email)
        .await?;

    Ok(Json(serde_json::json!({ "data": ticket })))
}

/// PUT /api/v1/tickets/{reference}/assignee
pub async fn assign(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<serde_json::Value>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ticket = state
        .tickets
        .assign(&reference, &input.assignee_email, &user.email)
        .await?;

    Ok(Json(serde_json::json!({ "data": ticket })))
}

// ---------------------------------------------------------------------------
// Sweeps (on-demand)
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets/sweeps/overdue
///
/// Run the overdue/breach pass now instead of waiting for the interval.
pub async fn run_overdue_sweep(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let report = state.tickets.check_overdue_tickets().await?;
    Ok(Json(serde_json::json!({ "data": report })))
}

/// POST /api/v1/tickets/sweeps/reminders
///
/// Deliver pending reminders now instead of waiting for the interval.
pub async fn run_reminder_sweep(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let report = state.tickets.send_reminders().await?;
    Ok(Json(serde_json::json!({ "data": report })))
}
