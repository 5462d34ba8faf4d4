//! The notifications HTTP boundary.
//!
//! [`HttpNotificationsApi`] talks to the Concierge API over reqwest:
//! `GET /notifications?userId=&read=` returns an array of notification
//! objects, `PUT /notifications/{id}` with `{"read": true}` marks one read.

use async_trait::async_trait;
use concierge_core::types::DbId;
use serde::{Deserialize, Serialize};

/// A notification as observed by the client.
///
/// Only `id` and `read` are interpreted; any other display fields the server
/// sends are preserved untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: DbId,
    pub read: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Errors from the notifications API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The store has no current user to scope requests by.
    #[error("No current user")]
    NoUser,

    /// A transport-level failure from reqwest.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned status {0}")]
    Status(u16),
}

/// Abstract notifications endpoint.
///
/// The production implementation is [`HttpNotificationsApi`]; tests provide
/// an in-memory fake to exercise the store's state transitions.
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    /// List notifications for a user, optionally filtered by read state.
    async fn list(
        &self,
        user_id: DbId,
        read: Option<bool>,
    ) -> Result<Vec<Notification>, ClientError>;

    /// Ask the server to mark one notification read.
    async fn mark_read(&self, id: DbId) -> Result<(), ClientError>;
}

/// reqwest-backed implementation of [`NotificationsApi`].
pub struct HttpNotificationsApi {
    http: reqwest::Client,
    /// Base URL up to and including the API prefix, e.g.
    /// `http://localhost:3000/api/v1`.
    base_url: String,
    /// Session id sent as a Bearer token on every request.
    session_id: Option<String>,
}

impl HttpNotificationsApi {
    /// Create a client for the API at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session_id: None,
        }
    }

    /// Attach the session credential used to authenticate requests.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_id {
            Some(session) => req.bearer_auth(session),
            None => req,
        }
    }
}

#[async_trait]
impl NotificationsApi for HttpNotificationsApi {
    async fn list(
        &self,
        user_id: DbId,
        read: Option<bool>,
    ) -> Result<Vec<Notification>, ClientError> {
        let mut params: Vec<(&str, String)> = vec![("userId", user_id.to_string())];
        if let Some(read) = read {
            params.push(("read", read.to_string()));
        }

        let url = format!("{}/notifications", self.base_url);
        let response = self
            .authorize(self.http.get(&url).query(&params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Notification list request rejected");
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    async fn mark_read(&self, id: DbId) -> Result<(), ClientError> {
        let url = format!("{}/notifications/{id}", self.base_url);
        let response = self
            .authorize(self.http.put(&url).json(&serde_json::json!({ "read": true })))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, notification_id = id, "Mark-read request rejected");
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(())
    }
}
