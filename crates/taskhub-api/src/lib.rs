//! # taskhub-api
//!
//! HTTP API layer for TaskHub built on Axum. Provides:
//!
//! - REST endpoints for signup, login, workers, tasks and notifications
//! - The `/ws` upgrade feeding sessions into the realtime gateway
//! - Error mapping from `AppError` to JSON error responses
//! - Request logging and CORS middleware

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
