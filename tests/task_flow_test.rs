//! Task lifecycle over HTTP and the notifications it produces.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_assignment_notifies_worker() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let worker = app.worker(&admin, "Wendy", "wendy@example.com").await;

    app.task(&admin, "Fix roof", Some(&worker)).await;

    let notifications = app.notifications(&worker).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "task_assigned");
    assert_eq!(notifications[0]["title"], "New Task Assigned");
    assert_eq!(
        notifications[0]["message"],
        "You have been assigned a new task: \"Fix roof\""
    );
    assert_eq!(notifications[0]["isRead"], false);
    assert!(app.notifications(&admin).await.is_empty());
}

#[tokio::test]
async fn test_completion_notifies_creator_only() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let worker = app.worker(&admin, "Wendy", "wendy@example.com").await;
    let task_id = app.task(&admin, "Fix roof", Some(&worker)).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/worker/task/{task_id}/status"),
            Some(json!({ "status": "completed" })),
            Some(&worker.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["task"]["status"], "completed");

    let notifications = app.notifications(&admin).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "task_completed");
    assert_eq!(
        notifications[0]["message"],
        "Task \"Fix roof\" has been marked as completed"
    );
}

#[tokio::test]
async fn test_worker_progress_notifies_creator() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let worker = app.worker(&admin, "Wendy", "wendy@example.com").await;
    let task_id = app.task(&admin, "Fix roof", Some(&worker)).await;

    app.request(
        "PUT",
        &format!("/api/worker/task/{task_id}/status"),
        Some(json!({ "status": "in-progress" })),
        Some(&worker.token),
    )
    .await;

    let notifications = app.notifications(&admin).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "task_status_changed");
    assert_eq!(
        notifications[0]["message"],
        "Task \"Fix roof\" status changed from pending to in-progress"
    );
}

#[tokio::test]
async fn test_worker_cannot_touch_unassigned_task() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let w1 = app.worker(&admin, "One", "one@example.com").await;
    let w2 = app.worker(&admin, "Two", "two@example.com").await;
    let task_id = app.task(&admin, "Fix roof", Some(&w1)).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/worker/task/{task_id}/status"),
            Some(json!({ "status": "completed" })),
            Some(&w2.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        "Task not found or not assigned to this worker"
    );

    let response = app
        .request(
            "PUT",
            &format!("/api/worker/task/{task_id}/status"),
            Some(json!({})),
            Some(&w1.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Status is required");
}

#[tokio::test]
async fn test_reassignment_and_listing() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let w1 = app.worker(&admin, "One", "one@example.com").await;
    let w2 = app.worker(&admin, "Two", "two@example.com").await;
    let task_id = app.task(&admin, "Fix roof", None).await;
    app.task(&admin, "Paint wall", Some(&w1)).await;

    let response = app
        .request(
            "PUT",
            "/api/admin/task/assign",
            Some(json!({ "taskId": task_id, "workerId": w2.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["task"]["assignedTo"], w2.id.as_str());
    assert_eq!(response.body["task"]["status"], "pending");

    let response = app
        .request(
            "GET",
            &format!("/api/admin/tasks?workerId={}", w2.id),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.body["tasks"].as_array().map(Vec::len), Some(1));

    let response = app
        .request("GET", "/api/worker/my-tasks", None, Some(&w1.token))
        .await;
    assert_eq!(response.body["tasks"][0]["title"], "Paint wall");

    let response = app
        .request("GET", "/api/admin/dashboard", None, Some(&admin.token))
        .await;
    assert_eq!(response.body["totalTasks"], 2);
    assert_eq!(response.body["pending"], 2);
    assert_eq!(response.body["totalWorkers"], 2);

    let response = app
        .request(
            "PUT",
            "/api/admin/task/assign",
            Some(json!({ "taskId": task_id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "All fields are required");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;

    let response = app
        .request("GET", "/api/admin/task/not-a-uuid", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "GET",
            "/api/admin/worker/00000000-0000-0000-0000-000000000000",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Worker not found");
}
