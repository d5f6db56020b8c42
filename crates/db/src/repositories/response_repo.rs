//! Repository for the `ticket_responses` table.

use helpdesk_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::ticket::{Attachment, TicketResponse};

/// Column list for `ticket_responses` queries.
const COLUMNS: &str = "id, ticket_id, seq, author, message, is_internal, attachments, created_at";

/// Provides append/list operations for the public conversation thread.
/// Responses are immutable once appended.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Append a response to a ticket's thread.
    ///
    /// In one transaction: touches the ticket row (taking its lock and
    /// refreshing `last_updated`, optionally moving it to `new_status`),
    /// computes the next per-ticket sequence number, and inserts the
    /// response.
    pub async fn append(
        pool: &PgPool,
        ticket_id: DbId,
        author: &str,
        message: &str,
        is_internal: bool,
        attachments: &[Attachment],
        new_status: Option<&str>,
    ) -> Result<TicketResponse, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE tickets \
             SET status = COALESCE($2, status), last_updated = NOW() \
             WHERE id = $1",
        )
        .bind(ticket_id)
        .bind(new_status)
        .execute(&mut *tx)
        .await?;

        let seq: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM ticket_responses WHERE ticket_id = $1",
        )
        .fetch_one(&mut *tx)
        .await?;

        let insert_query = format!(
            "INSERT INTO ticket_responses \
                (ticket_id, seq, author, message, is_internal, attachments) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, TicketResponse>(&insert_query)
            .bind(ticket_id)
            .bind(seq)
            .bind(author)
            .bind(message)
            .bind(is_internal)
            .bind(Json(attachments))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(response)
    }

    /// List a ticket's responses in thread order.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketResponse>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ticket_responses WHERE ticket_id = $1 ORDER BY seq");
        sqlx::query_as::<_, TicketResponse>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
