//! Handlers for the read-only `/directory` resources: departments, staff
//! roster, canned response templates.

use axum::extract::{Query, State};
use axum::Json;
use helpdesk_db::repositories::{CannedResponseRepo, DepartmentRepo, StaffRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

/// Optional department filter shared by the staff and canned-response
/// listings.
#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub department: Option<String>,
}

/// GET /api/v1/directory/departments
///
/// Public: the submission form needs the department list.
pub async fn list_departments(
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let departments = DepartmentRepo::list(&state.pool).await?;
    Ok(Json(serde_json::json!({ "data": departments })))
}

/// GET /api/v1/directory/staff
///
/// Active staff, optionally filtered to one department.
pub async fn list_staff(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let staff = match params.department.as_deref() {
        Some(department) => StaffRepo::list_active_by_department(&state.pool, department).await?,
        None => StaffRepo::list_active(&state.pool).await?,
    };
    Ok(Json(serde_json::json!({ "data": staff })))
}

/// GET /api/v1/directory/canned-responses
///
/// Reply templates; a department filter keeps global templates included.
pub async fn list_canned_responses(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let responses = CannedResponseRepo::list(&state.pool, params.department.as_deref()).await?;
    Ok(Json(serde_json::json!({ "data": responses })))
}
