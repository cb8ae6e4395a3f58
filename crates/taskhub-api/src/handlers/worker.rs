//! Worker self-service handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use taskhub_core::types::TaskId;
use taskhub_service::user::UpdateProfileRequest;

use crate::dto::request::StatusUpdateRequest;
use crate::error::ApiResult;
use crate::extractors::{ApiJson, AuthUser, parse_id};
use crate::state::AppState;

const NOT_ASSIGNED: &str = "Task not found or not assigned to this worker";

/// GET /api/worker/my-tasks
pub async fn my_tasks(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    let tasks = state.task_service.my_tasks(&auth).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// PUT /api/worker/task/{id}/status
pub async fn update_task_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Json<Value>> {
    let id: TaskId = parse_id(&id, NOT_ASSIGNED)?;
    let task = state
        .task_service
        .update_status(&auth, id, req.status)
        .await?;
    Ok(Json(json!({ "message": "Status Updated", "task": task })))
}

/// GET /api/worker/profile
pub async fn profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    let user = state.worker_service.profile(&auth).await?;
    Ok(Json(json!({ "user": user })))
}

/// PUT /api/worker/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    let user = state.worker_service.update_profile(&auth, req).await?;
    Ok(Json(json!({ "message": "Profile updated", "user": user })))
}
