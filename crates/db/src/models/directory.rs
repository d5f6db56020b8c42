//! Directory models: staff roster, departments, canned responses.
//!
//! These are read-mostly configuration; the ticket service mutates only
//! `staff_members.current_load`.

use helpdesk_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `staff_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffMember {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub department: String,
    /// Free-text keywords matched against ticket text during assignment.
    pub specialties: Vec<String>,
    pub is_active: bool,
    /// Number of currently assigned, unsettled tickets.
    pub current_load: i32,
}

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    /// Inbox notified about unassigned tickets in this department.
    pub email: String,
    pub description: String,
    pub auto_assign_enabled: bool,
    /// Manager emails notified on SLA breaches.
    pub managers: Vec<String>,
}

/// A row from the `canned_responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CannedResponse {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub department: String,
    pub created_by: String,
    pub is_global: bool,
}
