//! Session model and DTOs.

use concierge_core::types::{DbId, SessionId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table.
///
/// The `id` doubles as the bearer credential presented by clients.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: SessionId,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub expires_at: Timestamp,
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub id: SessionId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
