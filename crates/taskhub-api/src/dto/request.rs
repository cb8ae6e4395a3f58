//! Request DTOs that are specific to the HTTP surface.

use serde::{Deserialize, Serialize};

use taskhub_core::types::{NotificationId, UserId};
use taskhub_database::TaskFilter;
use taskhub_entity::task::TaskStatus;

/// Query string for `GET /api/admin/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub worker_id: Option<UserId>,
}

impl From<TaskListQuery> for TaskFilter {
    fn from(query: TaskListQuery) -> Self {
        Self {
            status: query
                .status
                .filter(|s| !s.trim().is_empty())
                .map(TaskStatus::from),
            assigned_to: query.worker_id,
        }
    }
}

/// Body of the status update endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Body of `PATCH /api/notifications/mark-read`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

impl MarkReadRequest {
    /// The well-formed ids. A malformed id cannot name an owned
    /// notification, so it is skipped.
    pub fn parsed_ids(&self) -> Vec<NotificationId> {
        self.ids.iter().filter_map(|id| id.parse().ok()).collect()
    }
}

/// Query string of the WebSocket handshake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WsQuery {
    /// Bearer token, as an alternative to the Authorization header.
    pub token: Option<String>,
}
