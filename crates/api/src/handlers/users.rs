//! Admin-only user management handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::roles::{self, ROLE_SUPERADMIN};
use helpdesk_core::types::DbId;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Body for `POST /users`: an admin creating an account with any role.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub registration_number: Option<String>,
    pub role: String,
    #[serde(default)]
    pub department: String,
    pub password: String,
}

/// GET /api/v1/users
pub async fn list_users(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(serde_json::json!({ "data": users })))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if !roles::is_staff(&input.role) && input.role != helpdesk_core::roles::ROLE_STUDENT {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: {}",
            input.role
        ))));
    }
    validate_password_strength(&input.password)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            registration_number: input.registration_number,
            role: input.role,
            department: input.department,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": user })),
    ))
}

/// POST /api/v1/users/{id}/deactivate
///
/// Deactivation is the only removal: accounts are never deleted, and the
/// last active superadmin cannot be deactivated.
pub async fn deactivate_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id.to_string()))?;

    if user.role == ROLE_SUPERADMIN
        && user.is_active
        && UserRepo::count_active_superadmins(&state.pool).await? <= 1
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot deactivate the only superadmin account".into(),
        )));
    }

    UserRepo::set_active(&state.pool, user_id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
