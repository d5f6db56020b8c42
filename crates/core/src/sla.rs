//! Service-level agreement policy and breach evaluation.
//!
//! Each priority maps to a fixed pair of response/resolution windows, plus
//! an overdue threshold used by the reminder sweep. `breached` is monotonic:
//! the repository layer flips it with a guarded UPDATE so evaluation here
//! only has to answer "would this ticket breach now".

use crate::ticket::{TicketPriority, TicketStatus};

/// Hours a reminder created by the overdue sweep is due after creation.
pub const REMINDER_LEAD_HOURS: i64 = 24;

/// Maximum hours to first response / full resolution for one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaPolicy {
    pub response_hours: i64,
    pub resolution_hours: i64,
}

/// The SLA window pair for a priority.
///
/// | priority | response | resolution |
/// |----------|----------|------------|
/// | urgent   | 1h       | 4h         |
/// | high     | 4h       | 24h        |
/// | medium   | 8h       | 48h        |
/// | low      | 24h      | 72h        |
pub fn policy_for(priority: TicketPriority) -> SlaPolicy {
    match priority {
        TicketPriority::Urgent => SlaPolicy {
            response_hours: 1,
            resolution_hours: 4,
        },
        TicketPriority::High => SlaPolicy {
            response_hours: 4,
            resolution_hours: 24,
        },
        TicketPriority::Medium => SlaPolicy {
            response_hours: 8,
            resolution_hours: 48,
        },
        TicketPriority::Low => SlaPolicy {
            response_hours: 24,
            resolution_hours: 72,
        },
    }
}

/// Hours after which an assigned ticket triggers a reminder to its assignee.
pub fn overdue_threshold_hours(priority: TicketPriority) -> i64 {
    match priority {
        TicketPriority::Urgent => 4,
        TicketPriority::High => 24,
        TicketPriority::Medium => 48,
        TicketPriority::Low => 72,
    }
}

/// Which SLA window a ticket has blown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreachKind {
    /// No first response within the response window (ticket still `open`).
    Response,
    /// Not resolved within the resolution window.
    Resolution,
}

impl BreachKind {
    pub fn describe(&self, elapsed_hours: f64) -> String {
        let window = match self {
            BreachKind::Response => "Response time",
            BreachKind::Resolution => "Resolution time",
        };
        format!(
            "{window} SLA breached. Ticket has been open for {} hours.",
            elapsed_hours.floor() as i64
        )
    }
}

/// Evaluate whether a not-yet-breached ticket breaches its SLA now.
///
/// The response window applies only while the ticket is still `open` (no
/// one has picked it up); the resolution window applies to every status
/// with a running SLA clock. Returns `None` for paused or settled tickets.
pub fn evaluate_breach(
    status: TicketStatus,
    elapsed_hours: f64,
    policy: SlaPolicy,
) -> Option<BreachKind> {
    if !status.is_active() {
        return None;
    }
    if status == TicketStatus::Open && elapsed_hours > policy.response_hours as f64 {
        return Some(BreachKind::Response);
    }
    if elapsed_hours > policy.resolution_hours as f64 {
        return Some(BreachKind::Resolution);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table_is_exact() {
        assert_eq!(
            policy_for(TicketPriority::Urgent),
            SlaPolicy {
                response_hours: 1,
                resolution_hours: 4
            }
        );
        assert_eq!(
            policy_for(TicketPriority::High),
            SlaPolicy {
                response_hours: 4,
                resolution_hours: 24
            }
        );
        assert_eq!(
            policy_for(TicketPriority::Medium),
            SlaPolicy {
                response_hours: 8,
                resolution_hours: 48
            }
        );
        assert_eq!(
            policy_for(TicketPriority::Low),
            SlaPolicy {
                response_hours: 24,
                resolution_hours: 72
            }
        );
    }

    #[test]
    fn overdue_thresholds() {
        assert_eq!(overdue_threshold_hours(TicketPriority::Urgent), 4);
        assert_eq!(overdue_threshold_hours(TicketPriority::High), 24);
        assert_eq!(overdue_threshold_hours(TicketPriority::Medium), 48);
        assert_eq!(overdue_threshold_hours(TicketPriority::Low), 72);
    }

    #[test]
    fn open_ticket_breaches_response_window_first() {
        let policy = policy_for(TicketPriority::Urgent);
        // 2h elapsed: past the 1h response window, inside the 4h resolution.
        assert_eq!(
            evaluate_breach(TicketStatus::Open, 2.0, policy),
            Some(BreachKind::Response)
        );
    }

    #[test]
    fn in_progress_ticket_breaches_resolution_window() {
        // 50h-old high ticket, in progress: past its 24h resolution window.
        let policy = policy_for(TicketPriority::High);
        assert_eq!(
            evaluate_breach(TicketStatus::InProgress, 50.0, policy),
            Some(BreachKind::Resolution)
        );
    }

    #[test]
    fn in_window_tickets_do_not_breach() {
        let policy = policy_for(TicketPriority::Medium);
        assert_eq!(evaluate_breach(TicketStatus::Open, 7.5, policy), None);
        assert_eq!(evaluate_breach(TicketStatus::InProgress, 47.9, policy), None);
    }

    #[test]
    fn paused_and_settled_tickets_never_breach() {
        let policy = policy_for(TicketPriority::Urgent);
        assert_eq!(evaluate_breach(TicketStatus::OnHold, 1000.0, policy), None);
        assert_eq!(evaluate_breach(TicketStatus::Resolved, 1000.0, policy), None);
        assert_eq!(evaluate_breach(TicketStatus::Closed, 1000.0, policy), None);
    }

    #[test]
    fn breach_description_floors_hours() {
        assert_eq!(
            BreachKind::Resolution.describe(50.7),
            "Resolution time SLA breached. Ticket has been open for 50 hours."
        );
    }
}
