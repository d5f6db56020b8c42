//! Overdue and reminder sweep passes.
//!
//! Both entry points are interval-driven (see [`crate::background::sweep`])
//! but may also be invoked on demand by admins. They share a try-lock guard
//! so overlapping cycles are skipped rather than run concurrently -- a
//! second in-flight pass could otherwise double-send reminders.

use chrono::{Duration, Utc};
use helpdesk_core::sla::{self, SlaPolicy, REMINDER_LEAD_HOURS};
use helpdesk_core::ticket::{TicketPriority, TicketStatus};
use helpdesk_db::models::ticket::Ticket;
use helpdesk_db::repositories::{DepartmentRepo, NoteRepo, ReminderRepo, TicketRepo};
use serde::Serialize;

use super::{messages, parse_status, TicketService, SYSTEM_AUTHOR};
use crate::error::AppResult;

/// Outcome of one overdue/breach pass.
#[derive(Debug, Default, Serialize)]
pub struct SweepReport {
    /// True when the pass was skipped because another cycle was running.
    pub skipped: bool,
    pub reminders_created: usize,
    pub breaches_flagged: usize,
}

/// Outcome of one reminder delivery pass.
#[derive(Debug, Default, Serialize)]
pub struct ReminderReport {
    /// True when the pass was skipped because another cycle was running.
    pub skipped: bool,
    pub sent: usize,
}

impl TicketService {
    /// Walk every ticket with a running SLA clock, scheduling assignee
    /// reminders for overdue tickets and flagging SLA breaches.
    ///
    /// Idempotent between state changes: an existing unsent, not-yet-due
    /// reminder suppresses a new one, and `sla_breached` flips at most
    /// once per ticket.
    pub async fn check_overdue_tickets(&self) -> AppResult<SweepReport> {
        let Ok(_guard) = self.sweep_guard.try_lock() else {
            tracing::warn!("Sweep cycle already running; skipping overdue check");
            return Ok(SweepReport {
                skipped: true,
                ..Default::default()
            });
        };

        let now = Utc::now();
        let mut report = SweepReport::default();

        for ticket in TicketRepo::list_active(&self.pool).await? {
            let elapsed_hours = (now - ticket.created_at).num_seconds() as f64 / 3600.0;

            let Ok(priority) = TicketPriority::parse(&ticket.priority) else {
                tracing::error!(reference = %ticket.reference, priority = %ticket.priority,
                    "Skipping ticket with corrupt priority");
                continue;
            };

            // Overdue: nudge the assignee once per reminder window.
            if let Some(assignee) = &ticket.assigned_to {
                if elapsed_hours > sla::overdue_threshold_hours(priority) as f64
                    && !ReminderRepo::has_pending(&self.pool, ticket.id, now).await?
                {
                    ReminderRepo::create(
                        &self.pool,
                        ticket.id,
                        assignee,
                        &messages::reminder_text(&ticket.reference, elapsed_hours),
                        now + Duration::hours(REMINDER_LEAD_HOURS),
                    )
                    .await?;
                    report.reminders_created += 1;
                }
            }

            // SLA: flag the breach exactly once, audit it, alert managers.
            if !ticket.sla_breached {
                let status = parse_status(&ticket)?;
                let policy = SlaPolicy {
                    response_hours: ticket.sla_response_hours as i64,
                    resolution_hours: ticket.sla_resolution_hours as i64,
                };
                if let Some(kind) = sla::evaluate_breach(status, elapsed_hours, policy) {
                    if TicketRepo::mark_breached(&self.pool, ticket.id).await? {
                        NoteRepo::append(
                            &self.pool,
                            ticket.id,
                            SYSTEM_AUTHOR,
                            &kind.describe(elapsed_hours),
                        )
                        .await?;
                        self.alert_managers(&ticket, kind).await?;
                        report.breaches_flagged += 1;
                    }
                }
            }
        }

        if report.reminders_created > 0 || report.breaches_flagged > 0 {
            tracing::info!(
                reminders_created = report.reminders_created,
                breaches_flagged = report.breaches_flagged,
                "Overdue sweep finished"
            );
        }
        Ok(report)
    }

    /// Deliver every unsent reminder whose ticket still has a running SLA
    /// clock. Reminders for since-settled tickets are silently skipped (and
    /// never cancelled: a reopened ticket picks them back up).
    pub async fn send_reminders(&self) -> AppResult<ReminderReport> {
        let Ok(_guard) = self.sweep_guard.try_lock() else {
            tracing::warn!("Sweep cycle already running; skipping reminder delivery");
            return Ok(ReminderReport {
                skipped: true,
                ..Default::default()
            });
        };

        let mut report = ReminderReport::default();

        for reminder in ReminderRepo::list_unsent(&self.pool).await? {
            let Some(ticket) = TicketRepo::find_by_id(&self.pool, reminder.ticket_id).await?
            else {
                continue;
            };
            let Ok(status) = TicketStatus::parse(&ticket.status) else {
                continue;
            };
            if !status.is_active() {
                continue;
            }

            // A failed send leaves the reminder unsent for the next cycle.
            match self
                .notifier
                .send(
                    &reminder.assignee_email,
                    &format!("[Reminder] Action Required for Ticket {}", ticket.reference),
                    &messages::reminder_email(&reminder.message),
                )
                .await
            {
                Ok(()) => {
                    if ReminderRepo::mark_sent(&self.pool, reminder.id).await? {
                        NoteRepo::append(
                            &self.pool,
                            ticket.id,
                            SYSTEM_AUTHOR,
                            &format!(
                                "Reminder sent to {}: {}",
                                reminder.assignee_email, reminder.message
                            ),
                        )
                        .await?;
                        report.sent += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        reference = %ticket.reference,
                        error = %e,
                        "Failed to send reminder"
                    );
                }
            }
        }

        if report.sent > 0 {
            tracing::info!(sent = report.sent, "Reminder delivery finished");
        }
        Ok(report)
    }

    async fn alert_managers(
        &self,
        ticket: &Ticket,
        kind: helpdesk_core::sla::BreachKind,
    ) -> AppResult<()> {
        let Some(department) = DepartmentRepo::find_by_name(&self.pool, &ticket.department).await?
        else {
            return Ok(());
        };
        for manager in &department.managers {
            self.notify(
                manager,
                &format!("[URGENT] SLA Breached for Ticket {}", ticket.reference),
                &messages::breach_alert(ticket, kind),
            )
            .await;
        }
        Ok(())
    }
}
