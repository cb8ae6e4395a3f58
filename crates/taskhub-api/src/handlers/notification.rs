//! Notification handlers. Every route is scoped to the caller's own
//! notifications; anything else reads as not found.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use taskhub_core::types::NotificationId;
use taskhub_service::notification::ListQuery;

use crate::dto::request::MarkReadRequest;
use crate::dto::response::UnreadCountResponse;
use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiQuery, AuthUser, parse_id};
use crate::state::AppState;

const NOT_FOUND: &str = "Notification not found";

/// GET /api/notifications?isRead=&limit=&page=
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Value>> {
    let page = state.notification_service.list(&auth, &query).await?;
    Ok(Json(json!({
        "success": true,
        "notifications": page.items,
        "pagination": page.pagination,
        "unreadCount": page.unread_count,
    })))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread_count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(UnreadCountResponse {
        success: true,
        unread_count,
    }))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: NotificationId = parse_id(&id, NOT_FOUND)?;
    let notification = state.notification_service.get(&auth, id).await?;
    Ok(Json(json!({ "success": true, "notification": notification })))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: NotificationId = parse_id(&id, NOT_FOUND)?;
    let notification = state.notification_service.mark_as_read(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notification marked as read",
        "notification": notification,
    })))
}

/// PATCH /api/notifications/mark-read
pub async fn mark_many_read(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<MarkReadRequest>,
) -> ApiResult<Json<Value>> {
    let modified = state
        .notification_service
        .mark_many_as_read(&auth, &req.parsed_ids())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notifications marked as read",
        "modifiedCount": modified,
    })))
}

/// PATCH /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let modified = state.notification_service.mark_all_as_read(&auth).await?;
    Ok(Json(json!({
        "success": true,
        "message": "All notifications marked as read",
        "modifiedCount": modified,
    })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: NotificationId = parse_id(&id, NOT_FOUND)?;
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notification deleted successfully",
    })))
}

/// DELETE /api/notifications/read/clear
pub async fn delete_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let deleted = state.notification_service.delete_all_read(&auth).await?;
    Ok(Json(json!({
        "success": true,
        "message": "All read notifications deleted",
        "deletedCount": deleted,
    })))
}
