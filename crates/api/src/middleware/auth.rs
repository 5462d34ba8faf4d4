//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use concierge_core::error::CoreError;
use concierge_core::types::{DbId, SessionId};

use crate::auth::Authenticator;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a session id carried as a Bearer token
/// in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: SessionUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The session this request authenticated with.
    pub session_id: SessionId,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <session-id>".into(),
            ))
        })?;

        let session_id: SessionId = token.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Malformed session id".into()))
        })?;

        let user_id = Authenticator::authenticate_by_session_id(&state.pool, session_id).await?;

        Ok(SessionUser {
            user_id,
            session_id,
        })
    }
}
