//! Repository for the `tickets` table.

use helpdesk_core::ticket::format_reference;
use helpdesk_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::ticket::{CreateTicket, Ticket};

/// Column list for `tickets` queries.
const COLUMNS: &str = "id, reference, title, description, department, priority, status, \
     created_by, assigned_to, assigned_at, created_at, last_updated, resolved_at, tags, \
     sla_response_hours, sla_resolution_hours, sla_breached, attachments, source";

/// Provides CRUD operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket, allocating its reference from `ticket_ref_seq`
    /// in the same transaction. Status starts as `open`.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seq: i64 = sqlx::query_scalar("SELECT nextval('ticket_ref_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let reference = format_reference(seq);

        let insert_query = format!(
            "INSERT INTO tickets \
                (reference, title, description, department, priority, created_by, tags, \
                 sla_response_hours, sla_resolution_hours, attachments, source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&insert_query)
            .bind(&reference)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.department)
            .bind(&input.priority)
            .bind(&input.created_by)
            .bind(&input.tags)
            .bind(input.sla_response_hours)
            .bind(input.sla_resolution_hours)
            .bind(Json(&input.attachments))
            .bind(&input.source)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ticket)
    }

    /// Find a ticket by its internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a ticket by its human-readable reference.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE reference = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }

    /// List every ticket, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets ORDER BY created_at DESC");
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    /// List tickets created by a user, newest first.
    pub async fn list_by_creator(pool: &PgPool, email: &str) -> Result<Vec<Ticket>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tickets WHERE created_by = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// List tickets assigned to a staff member, newest first.
    pub async fn list_by_assignee(pool: &PgPool, email: &str) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE assigned_to = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// List tickets in a department, newest first.
    pub async fn list_by_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tickets WHERE department = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// List tickets with a given status, newest first.
    pub async fn list_by_status(pool: &PgPool, status: &str) -> Result<Vec<Ticket>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tickets WHERE status = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List tickets whose SLA clock is running (`open`, `assigned`,
    /// `in-progress`), oldest first so the sweep works through the backlog
    /// in age order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE status IN ('open', 'assigned', 'in-progress') \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    /// Set a ticket's status, refreshing `last_updated` and stamping
    /// `resolved_at` when provided.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        resolved_at: Option<Timestamp>,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET \
                status = $2, \
                last_updated = NOW(), \
                resolved_at = COALESCE($3, resolved_at) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(status)
            .bind(resolved_at)
            .fetch_one(pool)
            .await
    }

    /// Assign a ticket: set the assignee, stamp `assigned_at`, and force
    /// status to `assigned`.
    pub async fn set_assignee(
        pool: &PgPool,
        id: DbId,
        assignee_email: &str,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET \
                assigned_to = $2, \
                assigned_at = NOW(), \
                status = 'assigned', \
                last_updated = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(assignee_email)
            .fetch_one(pool)
            .await
    }

    /// Flip `sla_breached` to true, once.
    ///
    /// Returns `true` only for the call that actually performed the flip,
    /// so the caller appends exactly one breach audit note; repeated sweeps
    /// are no-ops. The flag is never reset.
    pub async fn mark_breached(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets \
             SET sla_breached = true, last_updated = NOW() \
             WHERE id = $1 AND sla_breached = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ticket counts grouped by status.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT status, COUNT(*) FROM tickets GROUP BY status")
            .fetch_all(pool)
            .await
    }

    /// Ticket counts grouped by department.
    pub async fn count_by_department(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT department, COUNT(*) FROM tickets GROUP BY department")
            .fetch_all(pool)
            .await
    }

    /// Number of unsettled tickets currently in breach.
    pub async fn count_breached_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tickets \
             WHERE sla_breached = true AND status NOT IN ('resolved', 'closed')",
        )
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
