//! Handlers for the `/auth` resource (register, login, logout, account flows).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use concierge_core::password::validate_password_strength;
use concierge_core::types::{DbId, SessionId, Timestamp};
use concierge_db::models::user::UserResponse;
use concierge_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{AuthError, Authenticator};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    /// Arbitrary extra profile fields stored as-is on the user.
    #[serde(default = "empty_profile")]
    pub profile: serde_json::Value,
}

fn empty_profile() -> serde_json::Value {
    serde_json::json!({})
}

/// Response body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: DbId,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The session id; presented on later requests as `Bearer <session_id>`.
    pub session_id: SessionId,
    pub expires_at: Timestamp,
    pub user: UserResponse,
}

/// Request body for `POST /auth/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub token: String,
}

/// Request body for `POST /auth/password/forgot`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Request body for `POST /auth/password/reset`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new inactive account. Returns 201 with the new user id, or 409 if
/// the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let id =
        Authenticator::register(&state.pool, &input.email, &input.password, input.profile).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and issue a fresh session, replacing
/// any session the user already held. 401 for bad credentials (the body does
/// not reveal whether the email exists), 403 for unconfirmed accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user_id =
        Authenticator::authenticate_by_credentials(&state.pool, &input.email, &input.password)
            .await?;

    let session = Authenticator::initialize_session(&state.pool, user_id).await?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("User vanished during login".into()))?;

    Ok(Json(LoginResponse {
        session_id: session.id,
        expires_at: session.expires_at,
        user: user.into(),
    }))
}

/// POST /api/v1/auth/logout
///
/// Discard the session this request authenticated with. Returns 204.
pub async fn logout(State(state): State<AppState>, user: SessionUser) -> AppResult<StatusCode> {
    Authenticator::discard_session(&state.pool, user.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's public profile.
pub async fn me(State(state): State<AppState>, user: SessionUser) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidSession))?;
    Ok(Json(row.into()))
}

/// POST /api/v1/auth/confirm
///
/// Activate the account holding this confirmation token. Returns 204, or 401
/// if the token matches no pending account.
pub async fn confirm(
    State(state): State<AppState>,
    Json(input): Json<ConfirmRequest>,
) -> AppResult<StatusCode> {
    Authenticator::confirm_user_email(&state.pool, &input.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/password/forgot
///
/// Generate and store a reset token for the account. Always answers 202, even
/// for unknown emails, so the endpoint cannot be used to enumerate accounts.
/// Token delivery (email) is handled out of band.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    match Authenticator::generate_user_reset_token(&state.pool, &input.email).await {
        Ok(_token) => {}
        Err(AuthError::InvalidCredentials) => {
            tracing::debug!("Password reset requested for unknown email");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/password/reset
///
/// Set a new password using a reset token. Revokes all of the user's
/// sessions. Returns 204, or 401 for an unknown token.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    Authenticator::update_user_password(&state.pool, &input.password, &input.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
