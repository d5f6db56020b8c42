//! The ticket lifecycle service.
//!
//! [`TicketService`] owns everything a ticket goes through: creation with
//! keyword classification and load-balanced auto-assignment, response and
//! note threading, status transitions, manual assignment, and the periodic
//! overdue/reminder sweeps (see [`sweep`]). It is constructed once at
//! startup and injected via `AppState`.
//!
//! Notifications are fire-and-forget: a failed send is logged and never
//! fails the ticket operation that triggered it.

mod messages;
mod sweep;

use std::sync::Arc;

use chrono::Utc;
use helpdesk_core::assignment::{self, Candidate};
use helpdesk_core::classify;
use helpdesk_core::error::CoreError;
use helpdesk_core::sla;
use helpdesk_core::ticket::{TicketPriority, TicketSource, TicketStatus};
use helpdesk_db::models::directory::Department;
use helpdesk_db::models::ticket::{
    Attachment, CreateTicket, InternalNote, Ticket, TicketResponse,
};
use helpdesk_db::repositories::{
    DepartmentRepo, NoteRepo, ResponseRepo, StaffRepo, TicketRepo,
};
use helpdesk_db::DbPool;
use helpdesk_notify::Notifier;
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub use sweep::{ReminderReport, SweepReport};

/// Author recorded on system-generated audit notes.
const SYSTEM_AUTHOR: &str = "System";

/// Input for [`TicketService::create_ticket`]. Omitted department and
/// priority are inferred from the title + description.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub department: Option<String>,
    pub priority: Option<TicketPriority>,
    pub created_by: String,
    pub attachments: Vec<Attachment>,
    pub source: TicketSource,
}

/// A ticket with its full conversation thread and audit trail.
#[derive(Debug, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub responses: Vec<TicketResponse>,
    pub internal_notes: Vec<InternalNote>,
}

/// Aggregate ticket counts for dashboards.
#[derive(Debug, Serialize)]
pub struct TicketStats {
    pub by_status: Vec<(String, i64)>,
    pub by_department: Vec<(String, i64)>,
    /// Unsettled tickets currently past an SLA window.
    pub breached_active: i64,
}

/// The ticket lifecycle manager.
pub struct TicketService {
    pool: DbPool,
    notifier: Arc<Notifier>,
    /// Serializes sweep cycles; an overlapping cycle is skipped, not queued.
    sweep_guard: tokio::sync::Mutex<()>,
}

impl TicketService {
    pub fn new(pool: DbPool, notifier: Arc<Notifier>) -> Self {
        Self {
            pool,
            notifier,
            sweep_guard: tokio::sync::Mutex::new(()),
        }
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a ticket: classify omitted fields, compute the SLA from the
    /// priority, attempt auto-assignment, and notify the involved parties.
    pub async fn create_ticket(&self, input: NewTicket) -> AppResult<Ticket> {
        let text = format!("{} {}", input.title, input.description);

        let department_row = match &input.department {
            Some(name) => {
                // An explicit department must exist in the directory.
                let row = DepartmentRepo::find_by_name(&self.pool, name)
                    .await?
                    .ok_or_else(|| CoreError::Validation(format!("Unknown department: {name}")))?;
                Some(row)
            }
            // Inferred departments are always directory-backed in a seeded
            // deployment, but a missing row only disables auto-assignment.
            None => {
                DepartmentRepo::find_by_name(&self.pool, classify::detect_department(&text))
                    .await?
            }
        };
        let department = match &department_row {
            Some(row) => row.name.clone(),
            None => classify::detect_department(&text).to_string(),
        };

        let priority = input
            .priority
            .unwrap_or_else(|| classify::detect_priority(&text));
        let policy = sla::policy_for(priority);

        let ticket = TicketRepo::create(
            &self.pool,
            &CreateTicket {
                title: input.title,
                description: input.description,
                department,
                priority: priority.as_str().to_string(),
                created_by: input.created_by,
                tags: classify::generate_tags(&text),
                sla_response_hours: policy.response_hours as i32,
                sla_resolution_hours: policy.resolution_hours as i32,
                attachments: input.attachments,
                source: input.source.as_str().to_string(),
            },
        )
        .await?;

        let ticket = self.auto_assign(ticket, department_row.as_ref(), &text).await?;

        tracing::info!(
            reference = %ticket.reference,
            department = %ticket.department,
            priority = %ticket.priority,
            assigned_to = ticket.assigned_to.as_deref().unwrap_or("-"),
            "Ticket created"
        );

        self.notify(
            &ticket.created_by,
            &format!("[Helpdesk] Ticket Created: {}", ticket.reference),
            &messages::creation_confirmation(&ticket),
        )
        .await;

        match (&ticket.assigned_to, &department_row) {
            (Some(assignee), _) => {
                self.notify(
                    assignee,
                    &format!("[Helpdesk] New Ticket Assigned: {}", ticket.reference),
                    &messages::assignment_notice(&ticket),
                )
                .await;
            }
            (None, Some(dept)) => {
                self.notify(
                    &dept.email,
                    &format!("[Helpdesk] New Ticket: {}", ticket.reference),
                    &messages::department_notice(&ticket),
                )
                .await;
            }
            (None, None) => {}
        }

        Ok(ticket)
    }

    /// Pick and record the best staff member for a fresh ticket, if its
    /// department has auto-assignment enabled and an active roster.
    async fn auto_assign(
        &self,
        ticket: Ticket,
        department: Option<&Department>,
        text: &str,
    ) -> AppResult<Ticket> {
        let Some(department) = department else {
            return Ok(ticket);
        };
        if !department.auto_assign_enabled {
            return Ok(ticket);
        }

        let roster = StaffRepo::list_active_by_department(&self.pool, &department.name).await?;
        let candidates: Vec<Candidate<'_>> = roster
            .iter()
            .map(|staff| Candidate {
                email: &staff.email,
                specialties: &staff.specialties,
                current_load: staff.current_load,
            })
            .collect();

        let Some(index) = assignment::select(text, &candidates) else {
            return Ok(ticket);
        };
        let chosen = &roster[index];

        let ticket = TicketRepo::set_assignee(&self.pool, ticket.id, &chosen.email).await?;
        StaffRepo::adjust_load(&self.pool, &chosen.email, 1).await?;
        NoteRepo::append(
            &self.pool,
            ticket.id,
            SYSTEM_AUTHOR,
            &format!(
                "Ticket automatically assigned to {} ({})",
                chosen.name, chosen.email
            ),
        )
        .await?;

        Ok(ticket)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub async fn get_tickets(&self) -> AppResult<Vec<Ticket>> {
        Ok(TicketRepo::list_all(&self.pool).await?)
    }

    pub async fn get_tickets_by_user(&self, email: &str) -> AppResult<Vec<Ticket>> {
        Ok(TicketRepo::list_by_creator(&self.pool, email).await?)
    }

    pub async fn get_tickets_by_assignee(&self, email: &str) -> AppResult<Vec<Ticket>> {
        Ok(TicketRepo::list_by_assignee(&self.pool, email).await?)
    }

    pub async fn get_tickets_by_department(&self, department: &str) -> AppResult<Vec<Ticket>> {
        Ok(TicketRepo::list_by_department(&self.pool, department).await?)
    }

    pub async fn get_tickets_by_status(&self, status: TicketStatus) -> AppResult<Vec<Ticket>> {
        Ok(TicketRepo::list_by_status(&self.pool, status.as_str()).await?)
    }

    /// Fetch a ticket with its full thread. Callers are responsible for
    /// stripping staff-only content before showing this to a requester.
    pub async fn get_ticket_detail(&self, reference: &str) -> AppResult<TicketDetail> {
        let ticket = self.require_ticket(reference).await?;
        let responses = ResponseRepo::list_for_ticket(&self.pool, ticket.id).await?;
        let internal_notes = NoteRepo::list_for_ticket(&self.pool, ticket.id).await?;
        Ok(TicketDetail {
            ticket,
            responses,
            internal_notes,
        })
    }

    pub async fn stats(&self) -> AppResult<TicketStats> {
        Ok(TicketStats {
            by_status: TicketRepo::count_by_status(&self.pool).await?,
            by_department: TicketRepo::count_by_department(&self.pool).await?,
            breached_active: TicketRepo::count_breached_active(&self.pool).await?,
        })
    }

    // -----------------------------------------------------------------------
    // Thread
    // -----------------------------------------------------------------------

    /// Append a response to a ticket's thread.
    ///
    /// Public responses move `open`/`assigned` tickets to `in-progress` and
    /// notify the creator when someone else responded. Closed tickets
    /// accept no further public responses.
    pub async fn add_response(
        &self,
        reference: &str,
        author: &str,
        message: &str,
        is_internal: bool,
        attachments: &[Attachment],
    ) -> AppResult<Ticket> {
        let ticket = self.require_ticket(reference).await?;
        let status = parse_status(&ticket)?;

        if !is_internal && status.is_terminal() {
            return Err(CoreError::Conflict(
                "Ticket is closed and no longer accepts responses; please open a new ticket"
                    .into(),
            )
            .into());
        }

        let new_status = if is_internal {
            None
        } else {
            status.after_public_response()
        };

        ResponseRepo::append(
            &self.pool,
            ticket.id,
            author,
            message,
            is_internal,
            attachments,
            new_status.map(|s| s.as_str()),
        )
        .await?;

        if !is_internal && author != ticket.created_by {
            self.notify(
                &ticket.created_by,
                &format!("[Helpdesk] Update on Ticket: {}", ticket.reference),
                &messages::response_notice(&ticket, author, message),
            )
            .await;
        }

        self.require_ticket(reference).await
    }

    /// Append a staff-only note. The caller enforces the staff role; the
    /// ticket's status and `last_updated` are untouched.
    pub async fn add_internal_note(
        &self,
        reference: &str,
        author: &str,
        message: &str,
    ) -> AppResult<InternalNote> {
        let ticket = self.require_ticket(reference).await?;
        Ok(NoteRepo::append(&self.pool, ticket.id, author, message).await?)
    }

    // -----------------------------------------------------------------------
    // Status & assignment
    // -----------------------------------------------------------------------

    /// Move a ticket to a new status.
    ///
    /// Any target status is accepted except that `closed` is terminal.
    /// Entering `resolved`/`closed` stamps `resolved_at` and releases the
    /// assignee's load. The change is audited and the creator notified.
    pub async fn change_status(
        &self,
        reference: &str,
        new_status: TicketStatus,
        updated_by: &str,
    ) -> AppResult<Ticket> {
        let ticket = self.require_ticket(reference).await?;
        let old_status = parse_status(&ticket)?;
        old_status.validate_change(new_status)?;

        let now = Utc::now();
        let resolved_at = (new_status.is_settled() && !old_status.is_settled()).then_some(now);

        let updated =
            TicketRepo::update_status(&self.pool, ticket.id, new_status.as_str(), resolved_at)
                .await?;

        if resolved_at.is_some() {
            if let Some(assignee) = &updated.assigned_to {
                StaffRepo::adjust_load(&self.pool, assignee, -1).await?;
            }
            let resolution_hours =
                (now - updated.created_at).num_seconds() as f64 / 3600.0;
            tracing::info!(
                reference = %updated.reference,
                status = %updated.status,
                resolution_hours,
                "Ticket settled"
            );
        }

        NoteRepo::append(
            &self.pool,
            updated.id,
            updated_by,
            &format!("Status changed to {new_status}"),
        )
        .await?;

        self.notify(
            &updated.created_by,
            &format!("[Helpdesk] Update on Ticket: {}", updated.reference),
            &messages::status_notice(&updated, new_status),
        )
        .await;

        Ok(updated)
    }

    /// Assign a ticket to a named staff member.
    ///
    /// An unknown assignee is a not-found error and leaves the ticket
    /// unchanged. Load counters move with the assignment: the previous
    /// assignee (if any) is released, the new one charged.
    pub async fn assign(
        &self,
        reference: &str,
        assignee_email: &str,
        assigned_by: &str,
    ) -> AppResult<Ticket> {
        let ticket = self.require_ticket(reference).await?;
        let status = parse_status(&ticket)?;
        status.validate_change(TicketStatus::Assigned)?;

        let assignee = StaffRepo::find_by_email(&self.pool, assignee_email)
            .await?
            .ok_or_else(|| CoreError::not_found("Staff member", assignee_email))?;

        let previous = ticket.assigned_to.clone();
        let updated = TicketRepo::set_assignee(&self.pool, ticket.id, &assignee.email).await?;

        if previous.as_deref() != Some(assignee.email.as_str()) {
            if let Some(previous) = &previous {
                StaffRepo::adjust_load(&self.pool, previous, -1).await?;
            }
            StaffRepo::adjust_load(&self.pool, &assignee.email, 1).await?;
        }

        NoteRepo::append(
            &self.pool,
            updated.id,
            assigned_by,
            &format!("Ticket assigned to {} ({})", assignee.name, assignee.email),
        )
        .await?;

        self.notify(
            &assignee.email,
            &format!("[Helpdesk] Ticket Assigned: {}", updated.reference),
            &messages::assignment_notice(&updated),
        )
        .await;

        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn require_ticket(&self, reference: &str) -> AppResult<Ticket> {
        TicketRepo::find_by_reference(&self.pool, reference)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Ticket", reference)))
    }

    /// Fire-and-forget notification send: failures are logged, never
    /// propagated into ticket state.
    async fn notify(&self, to: &str, subject: &str, body: &str) {
        if let Err(e) = self.notifier.send(to, subject, body).await {
            tracing::error!(to, subject, error = %e, "Failed to send notification");
        }
    }
}

/// Parse a stored status string back into the enum. The service is the
/// only writer, so a mismatch means a corrupted row.
fn parse_status(ticket: &Ticket) -> Result<TicketStatus, CoreError> {
    TicketStatus::parse(&ticket.status).map_err(|_| {
        CoreError::Internal(format!(
            "Ticket {} has corrupt status {:?}",
            ticket.reference, ticket.status
        ))
    })
}
