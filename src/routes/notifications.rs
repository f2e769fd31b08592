/**
 * Owner Notification Routes
 * Guarded by the x-admin-key header
 */
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{check_admin_key, not_found, ErrorResponse};
use crate::data;
use crate::db::models::Notification;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub unread: usize,
}

fn admin_key() -> Option<&'static str> {
    crate::config::SITE.admin_api_key.as_deref()
}

/// GET /api/notifications
pub async fn list_notifications(
    headers: HeaderMap,
    Query(query): Query<NotificationQuery>,
) -> Response {
    list_for_key(admin_key(), &headers, query).await
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    mark_read_for_key(admin_key(), &headers, id).await
}

async fn list_for_key(
    expected: Option<&str>,
    headers: &HeaderMap,
    query: NotificationQuery,
) -> Response {
    if let Err(e) = check_admin_key(expected, headers) {
        return e.into_response();
    }

    let items = data::fetch_notifications(query.unread_only).await;
    let unread = items.iter().filter(|n| !n.is_read).count();
    (StatusCode::OK, Json(NotificationListResponse { items, unread })).into_response()
}

async fn mark_read_for_key(expected: Option<&str>, headers: &HeaderMap, id: Uuid) -> Response {
    if let Err(e) = check_admin_key(expected, headers) {
        return e.into_response();
    }

    match data::mark_notification_read(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found().into_response(),
        Err(e) => {
            tracing::error!(id = %id, error = %e, "failed to mark notification read");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update notification")),
            )
                .into_response()
        }
    }
}
