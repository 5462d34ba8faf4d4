//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`SessionUser`]. Responses use
//! the bare shapes the polling client consumes: listing returns a JSON array,
//! marking read returns 204.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use concierge_core::error::CoreError;
use concierge_core::types::DbId;
use concierge_db::models::notification::Notification;
use concierge_db::repositories::NotificationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Filter by read state; omit to return everything.
    pub read: Option<bool>,
    /// Accepted for wire compatibility with the polling client, which always
    /// scopes its requests by user. The effective scope is the session user.
    #[serde(rename = "userId")]
    pub user_id: Option<DbId>,
}

/// Request body for `PUT /notifications/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateNotificationRequest {
    pub read: bool,
}

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, newest first, optionally
/// filtered by read state. A `userId` query parameter naming anyone other
/// than the session user is rejected.
pub async fn list_notifications(
    user: SessionUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    if let Some(requested) = params.user_id {
        if requested != user.user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot read another user's notifications".into(),
            )));
        }
    }

    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, params.read).await?;

    Ok(Json(notifications))
}

/// PUT /api/v1/notifications/{id}
///
/// Mark a notification as read. Returns 204 on success, 404 if the
/// notification does not exist or belongs to another user. Un-reading is not
/// supported.
pub async fn update_notification(
    user: SessionUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
    Json(input): Json<UpdateNotificationRequest>,
) -> AppResult<StatusCode> {
    if !input.read {
        return Err(AppError::BadRequest(
            "Notifications can only be marked read".into(),
        ));
    }

    let changed = NotificationRepo::mark_read(&state.pool, notification_id, user.user_id).await?;
    if !changed {
        // Distinguish "already read" (fine, idempotent) from "not yours / gone".
        let exists = NotificationRepo::find_for_user(&state.pool, notification_id, user.user_id)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            }));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
