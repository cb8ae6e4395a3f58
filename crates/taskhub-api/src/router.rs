//! Route definitions for the TaskHub HTTP API.
//!
//! All REST routes are mounted under `/api`; the WebSocket upgrade lives at
//! `/ws`. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(worker_routes())
        .merge(notification_routes())
        .route("/health", get(handlers::health::health));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Signup and login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
}

/// Admin-only endpoints
fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/admin/worker", post(admin::create_worker))
        .route("/admin/workers", get(admin::list_workers))
        .route(
            "/admin/worker/{id}",
            get(admin::get_worker)
                .put(admin::update_worker)
                .delete(admin::delete_worker),
        )
        .route("/admin/task", post(admin::create_task))
        .route("/admin/tasks", get(admin::list_tasks))
        .route("/admin/task/assign", put(admin::assign_task))
        .route("/admin/task/{id}", get(admin::get_task))
        .route("/admin/task/{id}/status", put(admin::update_task_status))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/online-users", get(admin::online_users))
        .route(
            "/admin/profile",
            get(admin::profile).put(admin::update_profile),
        )
}

/// Worker self-service endpoints
fn worker_routes() -> Router<AppState> {
    use handlers::worker;

    Router::new()
        .route("/worker/my-tasks", get(worker::my_tasks))
        .route("/worker/task/{id}/status", put(worker::update_task_status))
        .route(
            "/worker/profile",
            get(worker::profile).put(worker::update_profile),
        )
}

/// Notification history and read state
fn notification_routes() -> Router<AppState> {
    use handlers::notification as n;

    Router::new()
        .route("/notifications", get(n::list_notifications))
        .route("/notifications/unread-count", get(n::unread_count))
        .route("/notifications/mark-all-read", patch(n::mark_all_read))
        .route("/notifications/mark-read", patch(n::mark_many_read))
        .route("/notifications/read/clear", delete(n::delete_all_read))
        .route(
            "/notifications/{id}",
            get(n::get_notification).delete(n::delete_notification),
        )
        .route("/notifications/{id}/read", patch(n::mark_read))
}
