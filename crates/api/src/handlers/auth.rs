//! Handlers for registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::roles::ROLE_STUDENT;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body for `POST /auth/register`. Self-registration always creates a
/// student account; staff and admin accounts are created by admins.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub registration_number: Option<String>,
    pub password: String,
    #[serde(default)]
    pub department: String,
}

/// Body for `POST /auth/login`. The identifier is an email address or a
/// registration number.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password_strength(&input.password)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    // Friendly duplicate checks up front; the unique constraints still
    // backstop races.
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "A user with this email already exists".into(),
        )));
    }
    if let Some(reg_no) = &input.registration_number {
        if UserRepo::find_by_identifier(&state.pool, reg_no)
            .await?
            .is_some()
        {
            return Err(AppError::Core(CoreError::Validation(
                "A user with this registration number already exists".into(),
            )));
        }
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            registration_number: input.registration_number,
            role: ROLE_STUDENT.to_string(),
            department: input.department,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": user })),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange credentials for a JWT access token. Invalid credentials and
/// unknown identifiers are indistinguishable in the response.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_identifier(&state.pool, &input.identifier)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(serde_json::json!({
        "data": { "token": token, "user": user }
    })))
}
