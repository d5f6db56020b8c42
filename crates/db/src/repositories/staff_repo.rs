//! Repository for the `staff_members` table.

use sqlx::PgPool;

use crate::models::directory::StaffMember;

/// Column list for `staff_members` queries.
const COLUMNS: &str = "id, name, email, department, specialties, is_active, current_load";

/// Provides read access to the staff directory plus the one mutation the
/// ticket service performs: load accounting.
pub struct StaffRepo;

impl StaffRepo {
    /// List all active staff members.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<StaffMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff_members WHERE is_active = true ORDER BY id"
        );
        sqlx::query_as::<_, StaffMember>(&query).fetch_all(pool).await
    }

    /// List the active staff of one department, in roster (id) order --
    /// assignment tie-breaking depends on this order being stable.
    pub async fn list_active_by_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<StaffMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff_members \
             WHERE department = $1 AND is_active = true \
             ORDER BY id"
        );
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// Find a staff member by email, active or not.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<StaffMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_members WHERE email = $1");
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Adjust a staff member's current load by `delta`, clamped at zero.
    pub async fn adjust_load(pool: &PgPool, email: &str, delta: i32) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE staff_members \
             SET current_load = GREATEST(current_load + $2, 0) \
             WHERE email = $1",
        )
        .bind(email)
        .bind(delta)
        .execute(pool)
        .await?;
        Ok(())
    }
}
