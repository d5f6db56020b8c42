//! Repository for the `departments` table (read-only configuration).

use sqlx::PgPool;

use crate::models::directory::Department;

/// Column list for `departments` queries.
const COLUMNS: &str = "id, name, email, description, auto_assign_enabled, managers";

pub struct DepartmentRepo;

impl DepartmentRepo {
    /// List all departments in configuration order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY id");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }

    /// Find a department by its display name.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE name = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
