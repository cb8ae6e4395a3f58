//! Admin-only handlers: workers, tasks, the dashboard, and presence.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use taskhub_core::types::{TaskId, UserId};
use taskhub_service::user::{CreateWorkerRequest, UpdateProfileRequest, UpdateWorkerRequest};
use taskhub_service::{AssignTaskRequest, CreateTaskRequest, Dashboard};

use crate::dto::request::{StatusUpdateRequest, TaskListQuery};
use crate::dto::response::OnlineUsersResponse;
use crate::error::ApiResult;
use crate::extractors::{AdminUser, ApiJson, ApiQuery, parse_id};
use crate::state::AppState;

/// POST /api/admin/worker
pub async fn create_worker(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(req): ApiJson<CreateWorkerRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let worker = state.worker_service.create_worker(&admin, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Worker Created Successfully", "worker": worker })),
    ))
}

/// GET /api/admin/workers
pub async fn list_workers(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<Value>> {
    let workers = state.worker_service.list_workers(&admin).await?;
    Ok(Json(json!({ "workers": workers })))
}

/// GET /api/admin/worker/{id}
pub async fn get_worker(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: UserId = parse_id(&id, "Worker not found")?;
    let worker = state.worker_service.get_worker(&admin, id).await?;
    Ok(Json(json!({ "worker": worker })))
}

/// PUT /api/admin/worker/{id}
pub async fn update_worker(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateWorkerRequest>,
) -> ApiResult<Json<Value>> {
    let id: UserId = parse_id(&id, "Worker not found")?;
    let worker = state.worker_service.update_worker(&admin, id, req).await?;
    Ok(Json(json!({ "message": "Worker Updated", "worker": worker })))
}

/// DELETE /api/admin/worker/{id}
///
/// Also closes the worker's live sessions.
pub async fn delete_worker(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: UserId = parse_id(&id, "Worker not found")?;
    let worker = state.worker_service.delete_worker(&admin, id).await?;
    state.gateway.disconnect_user(worker.id);
    Ok(Json(json!({ "message": "Worker deleted" })))
}

/// POST /api/admin/task
pub async fn create_task(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let task = state.task_service.create_task(&admin, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created", "task": task })),
    ))
}

/// GET /api/admin/tasks?status=&workerId=
pub async fn list_tasks(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> ApiResult<Json<Value>> {
    let tasks = state.task_service.list_tasks(&admin, query.into()).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// GET /api/admin/task/{id}
pub async fn get_task(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id: TaskId = parse_id(&id, "Task not found")?;
    let task = state.task_service.get_task(&admin, id).await?;
    Ok(Json(json!({ "task": task })))
}

/// PUT /api/admin/task/assign
pub async fn assign_task(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(req): ApiJson<AssignTaskRequest>,
) -> ApiResult<Json<Value>> {
    let task = state.task_service.assign_task(&admin, req).await?;
    Ok(Json(json!({ "message": "Task assigned", "task": task })))
}

/// PUT /api/admin/task/{id}/status
pub async fn update_task_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Json<Value>> {
    let id: TaskId = parse_id(&id, "Task not found")?;
    let task = state
        .task_service
        .update_status(&admin, id, req.status)
        .await?;
    Ok(Json(json!({ "message": "Status Updated", "task": task })))
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.task_service.dashboard(&admin).await?))
}

/// GET /api/admin/online-users
pub async fn online_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<OnlineUsersResponse> {
    let registry = state.gateway.registry();
    Json(OnlineUsersResponse {
        count: registry.online_count(),
        user_ids: registry.online_user_ids(),
    })
}

/// GET /api/admin/profile
pub async fn profile(
    State(state): State<AppState>,
    admin: AdminUser,
) -> ApiResult<Json<Value>> {
    let user = state.worker_service.profile(&admin).await?;
    Ok(Json(json!({ "user": user })))
}

/// PUT /api/admin/profile
pub async fn update_profile(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    let user = state.worker_service.update_profile(&admin, req).await?;
    Ok(Json(json!({ "message": "Profile updated", "user": user })))
}
