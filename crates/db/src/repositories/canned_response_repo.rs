//! Repository for the `canned_responses` table (read-only templates).

use sqlx::PgPool;

use crate::models::directory::CannedResponse;

/// Column list for `canned_responses` queries.
const COLUMNS: &str = "id, title, content, department, created_by, is_global";

pub struct CannedResponseRepo;

impl CannedResponseRepo {
    /// List canned responses. With a department filter, global templates
    /// are always included alongside the department's own.
    pub async fn list(
        pool: &PgPool,
        department: Option<&str>,
    ) -> Result<Vec<CannedResponse>, sqlx::Error> {
        match department {
            Some(department) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM canned_responses \
                     WHERE department = $1 OR is_global = true \
                     ORDER BY id"
                );
                sqlx::query_as::<_, CannedResponse>(&query)
                    .bind(department)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM canned_responses ORDER BY id");
                sqlx::query_as::<_, CannedResponse>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
