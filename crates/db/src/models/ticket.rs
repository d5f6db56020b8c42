//! Ticket entity models and DTOs.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// An uploaded file referenced from a ticket or response. Stored as JSONB;
/// the file bytes themselves live wherever `url` points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
}

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: DbId,
    /// Human-readable reference, e.g. `TICKET-1001`. Unique, never reused.
    pub reference: String,
    pub title: String,
    pub description: String,
    pub department: String,
    pub priority: String,
    pub status: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub assigned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub last_updated: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub tags: Vec<String>,
    pub sla_response_hours: i32,
    pub sla_resolution_hours: i32,
    pub sla_breached: bool,
    pub attachments: Json<Vec<Attachment>>,
    pub source: String,
}

/// Insert payload for a new ticket. The reference is allocated by the
/// repository from `ticket_ref_seq`; status always starts `open`.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub department: String,
    pub priority: String,
    pub created_by: String,
    pub tags: Vec<String>,
    pub sla_response_hours: i32,
    pub sla_resolution_hours: i32,
    pub attachments: Vec<Attachment>,
    pub source: String,
}

/// A row from the `ticket_responses` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TicketResponse {
    pub id: DbId,
    pub ticket_id: DbId,
    /// Position in the ticket's thread, starting at 1.
    pub seq: i32,
    pub author: String,
    pub message: String,
    pub is_internal: bool,
    pub attachments: Json<Vec<Attachment>>,
    pub created_at: Timestamp,
}

/// A row from the `internal_notes` table. Notes are staff-only and double
/// as the audit log (assignment, status change, SLA breach, reminder sent).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct InternalNote {
    pub id: DbId,
    pub ticket_id: DbId,
    pub seq: i32,
    pub author: String,
    pub message: String,
    pub created_at: Timestamp,
}

/// A row from the `ticket_reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketReminder {
    pub id: DbId,
    pub ticket_id: DbId,
    pub assignee_email: String,
    pub message: String,
    pub due_at: Timestamp,
    pub sent: bool,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
