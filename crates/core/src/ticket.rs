//! Ticket lifecycle: status, priority, and source enumerations plus the
//! transition rules enforced by the ticket service.
//!
//! Statuses are stored as their kebab-case string form (`"in-progress"`),
//! matching the database TEXT columns and the public API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a ticket.
///
/// The transition graph is deliberately loose: staff may move a ticket to
/// any state except *out of* `closed`, which is terminal. The one automatic
/// transition is `open`/`assigned` -> `in-progress` when a public response
/// is added (see [`TicketStatus::after_public_response`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    Assigned,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Statuses with a running SLA clock: eligible for the overdue and
    /// breach sweeps. `on-hold` pauses the clock; `resolved`/`closed` stop it.
    pub const ACTIVE: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Assigned => "assigned",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::OnHold => "on-hold",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "assigned" => Ok(TicketStatus::Assigned),
            "in-progress" => Ok(TicketStatus::InProgress),
            "on-hold" => Ok(TicketStatus::OnHold),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket status: {other}"
            ))),
        }
    }

    /// `closed` is the only terminal state: no responses, no transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Closed)
    }

    /// Whether the ticket is done (work finished, load released).
    pub fn is_settled(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// Whether the SLA clock is running for this status.
    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// The status a ticket moves to when a public response is appended,
    /// if any: `open` and `assigned` advance to `in-progress`.
    pub fn after_public_response(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Open | TicketStatus::Assigned => Some(TicketStatus::InProgress),
            _ => None,
        }
    }

    /// Validate a caller-driven status change away from `self`.
    ///
    /// Any target is accepted except that `closed` admits no further
    /// changes (reopening a closed ticket means filing a new one).
    pub fn validate_change(&self, to: TicketStatus) -> Result<(), CoreError> {
        if self.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Ticket is closed and cannot be moved to {}; please open a new ticket",
                to.as_str()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority, in descending order of urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Urgent,
    High,
    Medium,
    Low,
}

impl TicketPriority {
    /// All priorities in detection order (most to least urgent). Keyword
    /// scoring walks this order, so earlier entries win exact ties.
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Urgent,
        TicketPriority::High,
        TicketPriority::Medium,
        TicketPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Urgent => "urgent",
            TicketPriority::High => "high",
            TicketPriority::Medium => "medium",
            TicketPriority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "urgent" => Ok(TicketPriority::Urgent),
            "high" => Ok(TicketPriority::High),
            "medium" => Ok(TicketPriority::Medium),
            "low" => Ok(TicketPriority::Low),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket priority: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel a ticket arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketSource {
    Web,
    Email,
    Phone,
    WalkIn,
}

impl TicketSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketSource::Web => "web",
            TicketSource::Email => "email",
            TicketSource::Phone => "phone",
            TicketSource::WalkIn => "walk-in",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "web" => Ok(TicketSource::Web),
            "email" => Ok(TicketSource::Email),
            "phone" => Ok(TicketSource::Phone),
            "walk-in" => Ok(TicketSource::WalkIn),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket source: {other}"
            ))),
        }
    }
}

/// Render a ticket reference from its sequence number, e.g. `TICKET-1001`.
pub fn format_reference(seq: i64) -> String {
    format!("TICKET-{seq}")
}

/// Parse the sequence number out of a `TICKET-<n>` reference.
pub fn parse_reference(reference: &str) -> Option<i64> {
    reference.strip_prefix("TICKET-")?.parse().ok()
}
