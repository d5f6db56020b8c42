//! User account models and DTOs.

use helpdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table. The password hash never serializes into
/// API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub registration_number: Option<String>,
    pub role: String,
    pub department: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Insert payload for a new user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub registration_number: Option<String>,
    pub role: String,
    pub department: String,
    pub password_hash: String,
}
