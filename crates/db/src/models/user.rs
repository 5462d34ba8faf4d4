//! User entity model and DTOs.

use concierge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and live confirmation/reset tokens -- NEVER
/// serialize this to API responses directly. Use [`UserResponse`] for
/// external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub confirmation_token: Option<String>,
    pub confirmed_at: Option<Timestamp>,
    pub reset_token: Option<String>,
    /// Arbitrary profile fields captured at registration.
    pub profile: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no secrets).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub is_active: bool,
    pub profile: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed and the
/// confirmation token already generated by the caller; users start inactive.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub confirmation_token: String,
    pub profile: serde_json::Value,
}
