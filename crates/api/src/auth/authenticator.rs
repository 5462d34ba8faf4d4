//! The account authentication workflows.
//!
//! [`Authenticator`] orchestrates the user and session repositories plus the
//! password/token utilities in `concierge-core`. It owns no state; every
//! method takes the pool and runs one workflow to completion with sequential
//! awaited I/O.
//!
//! Business failures are explicit [`AuthError`] variants rather than empty
//! returns, with one deliberate exception: an unknown email and a wrong
//! password both map to [`AuthError::InvalidCredentials`], so callers cannot
//! use the login path to probe which addresses have accounts.

use chrono::{Duration, Utc};
use concierge_core::password::{hash_password, verify_password};
use concierge_core::token::generate_token;
use concierge_core::types::{DbId, SessionId};
use concierge_db::models::session::{CreateSession, Session};
use concierge_db::models::user::CreateUser;
use concierge_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;
use uuid::Uuid;

/// Fixed session lifetime: 5 weeks.
pub const SESSION_MAX_AGE_MS: i64 = 3_024_000_000;

/// Errors produced by authentication workflows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A user with this email already exists.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Unknown email or wrong password. Intentionally a single variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Credentials are valid but the account has not confirmed its email.
    #[error("Account is not activated")]
    AccountInactive,

    /// The session is unknown, expired, or its user no longer exists.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// The confirmation or reset token matched no pending user.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed.
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Stateless orchestrator for account workflows.
pub struct Authenticator;

impl Authenticator {
    /// Register a new account.
    ///
    /// Hashes the password, generates a confirmation token, and creates an
    /// inactive user carrying the given extra profile fields. Fails with
    /// [`AuthError::EmailTaken`] if the email is already registered; the
    /// database unique constraint backs the up-front check, so a concurrent
    /// duplicate registration also lands here.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        password: &str,
        profile: serde_json::Value,
    ) -> Result<DbId, AuthError> {
        if UserRepo::find_by_email(pool, email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash =
            hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let input = CreateUser {
            email: email.to_string(),
            password_hash,
            confirmation_token: generate_token(),
            profile,
        };
        let user = UserRepo::create(pool, &input)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    AuthError::EmailTaken
                }
                _ => AuthError::Database(e),
            })?;

        tracing::info!(user_id = user.id, "Registered new account");
        Ok(user.id)
    }

    /// Authenticate with email + password, returning the user id.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// Accounts that have not confirmed their email cannot log in.
    pub async fn authenticate_by_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<DbId, AuthError> {
        let user = UserRepo::find_by_email(pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        Ok(user.id)
    }

    /// Authenticate with a session id, returning the owning user id.
    ///
    /// Expired sessions are rejected even if their row still exists, and a
    /// session whose user has been removed is treated the same as an unknown
    /// session.
    pub async fn authenticate_by_session_id(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<DbId, AuthError> {
        let session = SessionRepo::find_live(pool, session_id)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        let user = UserRepo::find_by_id(pool, session.user_id)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        Ok(user.id)
    }

    /// Issue a new session for the user, replacing any existing ones.
    ///
    /// The new session expires [`SESSION_MAX_AGE_MS`] after creation. The
    /// delete-then-insert runs in one transaction inside the repository.
    pub async fn initialize_session(pool: &PgPool, user_id: DbId) -> Result<Session, AuthError> {
        let input = CreateSession {
            id: Uuid::new_v4(),
            user_id,
            expires_at: Utc::now() + Duration::milliseconds(SESSION_MAX_AGE_MS),
        };
        let session = SessionRepo::replace_for_user(pool, &input).await?;

        tracing::info!(user_id, session_id = %session.id, "Issued session");
        Ok(session)
    }

    /// Discard a single session. Idempotent.
    pub async fn discard_session(pool: &PgPool, session_id: SessionId) -> Result<(), AuthError> {
        SessionRepo::delete(pool, session_id).await?;
        Ok(())
    }

    /// Activate the pending account holding this confirmation token.
    ///
    /// Clears the token, stamps the confirmation date, and marks the user
    /// active. Returns the activated user's id.
    pub async fn confirm_user_email(pool: &PgPool, token: &str) -> Result<DbId, AuthError> {
        let user = UserRepo::find_by_confirmation_token(pool, token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        // The update is a no-op if the account got activated in the meantime.
        let updated = UserRepo::confirm(pool, user.id).await?;
        if !updated {
            return Err(AuthError::InvalidToken);
        }

        tracing::info!(user_id = user.id, "Confirmed account email");
        Ok(user.id)
    }

    /// Generate and store a password reset token for the account.
    ///
    /// Returns the token; delivering it to the user (e.g. by email) is the
    /// caller's responsibility. An unknown email reports
    /// [`AuthError::InvalidCredentials`] so the HTTP layer can answer
    /// uniformly without confirming the account exists.
    pub async fn generate_user_reset_token(
        pool: &PgPool,
        email: &str,
    ) -> Result<String, AuthError> {
        let user = UserRepo::find_by_email(pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = generate_token();
        UserRepo::set_reset_token(pool, user.id, &token).await?;

        tracing::info!(user_id = user.id, "Generated password reset token");
        Ok(token)
    }

    /// Set a new password using a reset token.
    ///
    /// Re-hashes and stores the password, clears the reset token, and revokes
    /// every session the user holds, forcing re-login everywhere. Returns the
    /// affected user's id.
    pub async fn update_user_password(
        pool: &PgPool,
        password: &str,
        token: &str,
    ) -> Result<DbId, AuthError> {
        let user = UserRepo::find_by_reset_token(pool, token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let password_hash =
            hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?;
        UserRepo::update_password(pool, user.id, &password_hash).await?;

        let revoked = SessionRepo::delete_for_user(pool, user.id).await?;
        tracing::info!(user_id = user.id, revoked, "Password updated, sessions revoked");

        Ok(user.id)
    }
}
