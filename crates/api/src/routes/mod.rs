pub mod auth;
pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register            register (public)
/// /auth/login               login (public)
/// /auth/logout              logout (requires auth)
/// /auth/me                  current user (requires auth)
/// /auth/confirm             confirm email (public)
/// /auth/password/forgot     request reset token (public)
/// /auth/password/reset      set new password (public)
///
/// /notifications            list (requires auth)
/// /notifications/{id}       mark read (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notifications", notification::router())
}
