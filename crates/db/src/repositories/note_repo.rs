//! Repository for the `internal_notes` table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::InternalNote;

/// Column list for `internal_notes` queries.
const COLUMNS: &str = "id, ticket_id, seq, author, message, created_at";

/// Provides append/list operations for staff notes and system audit
/// entries. Notes do not refresh the ticket's `last_updated` -- they are
/// invisible to the requester.
pub struct NoteRepo;

impl NoteRepo {
    /// Append a note, locking the ticket row to serialize per-ticket
    /// sequence numbering.
    pub async fn append(
        pool: &PgPool,
        ticket_id: DbId,
        author: &str,
        message: &str,
    ) -> Result<InternalNote, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM tickets WHERE id = $1 FOR UPDATE")
            .bind(ticket_id)
            .execute(&mut *tx)
            .await?;

        let seq: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM internal_notes WHERE ticket_id = $1",
        )
        .fetch_one(&mut *tx)
        .await?;

        let insert_query = format!(
            "INSERT INTO internal_notes (ticket_id, seq, author, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, InternalNote>(&insert_query)
            .bind(ticket_id)
            .bind(seq)
            .bind(author)
            .bind(message)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(note)
    }

    /// List a ticket's notes in order.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<InternalNote>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM internal_notes WHERE ticket_id = $1 ORDER BY seq");
        sqlx::query_as::<_, InternalNote>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
