//! Signup and login handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use taskhub_service::user::{LoginRequest, LoginResponse, SignupRequest};

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let admin = state.auth_service.signup(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Admin Created Successfully", "user": admin })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.auth_service.login(req).await?;
    Ok(Json(response))
}
