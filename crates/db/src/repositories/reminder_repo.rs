//! Repository for the `ticket_reminders` table.

use helpdesk_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::ticket::TicketReminder;

/// Column list for `ticket_reminders` queries.
const COLUMNS: &str =
    "id, ticket_id, assignee_email, message, due_at, sent, sent_at, created_at";

/// Provides operations for one-shot assignee reminders.
pub struct ReminderRepo;

impl ReminderRepo {
    /// Schedule a reminder for a ticket's assignee.
    pub async fn create(
        pool: &PgPool,
        ticket_id: DbId,
        assignee_email: &str,
        message: &str,
        due_at: Timestamp,
    ) -> Result<TicketReminder, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_reminders (ticket_id, assignee_email, message, due_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketReminder>(&query)
            .bind(ticket_id)
            .bind(assignee_email)
            .bind(message)
            .bind(due_at)
            .fetch_one(pool)
            .await
    }

    /// Whether an unsent, not-yet-due reminder already exists for a ticket.
    /// The overdue sweep uses this to avoid stacking duplicates.
    pub async fn has_pending(
        pool: &PgPool,
        ticket_id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM ticket_reminders \
                WHERE ticket_id = $1 AND sent = false AND due_at > $2 \
             )",
        )
        .bind(ticket_id)
        .bind(now)
        .fetch_one(pool)
        .await?;
        Ok(exists.unwrap_or(false))
    }

    /// All unsent reminders, oldest first.
    pub async fn list_unsent(pool: &PgPool) -> Result<Vec<TicketReminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ticket_reminders WHERE sent = false ORDER BY created_at"
        );
        sqlx::query_as::<_, TicketReminder>(&query)
            .fetch_all(pool)
            .await
    }

    /// Mark a reminder as sent, once. Returns `true` only for the call that
    /// performed the flip; `sent` is never reset.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ticket_reminders \
             SET sent = true, sent_at = NOW() \
             WHERE id = $1 AND sent = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every reminder for a ticket, oldest first.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketReminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ticket_reminders WHERE ticket_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, TicketReminder>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
