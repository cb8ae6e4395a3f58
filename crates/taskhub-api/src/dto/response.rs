//! Response DTOs.

use serde::{Deserialize, Serialize};

use taskhub_core::types::UserId;
use taskhub_realtime::MetricsSnapshot;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when the backing store answers, `degraded` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Live WebSocket sessions.
    pub ws_connections: usize,
    /// Users with at least one live session.
    pub online_users: usize,
    /// Gateway counters.
    pub realtime: MetricsSnapshot,
}

/// Users with at least one live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersResponse {
    pub count: usize,
    pub user_ids: Vec<UserId>,
}

/// Number of unread notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub success: bool,
    pub unread_count: u64,
}
