//! The realtime gateway: session lifecycle, rooms and addressed delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::{debug, error, info, warn};

use taskhub_auth::SessionIdentity;
use taskhub_core::config::realtime::RealtimeConfig;
use taskhub_core::traits::EventPublisher;
use taskhub_core::types::{ConnectionId, UserId};
use taskhub_entity::user::UserRole;

use crate::connection::handle::{ConnectionHandle, SendOutcome};
use crate::connection::heartbeat::{HeartbeatConfig, run_reaper};
use crate::connection::pool::ConnectionPool;
use crate::message::types::names;
use crate::message::{
    Connected, Envelope, ErrorPayload, InboundMessage, Pong, TypingUpdate, UserStatusUpdate,
};
use crate::metrics::{GatewayMetrics, MetricsSnapshot};
use crate::registry::ConnectionRegistry;
use crate::room::{RoomRegistry, role_room, user_room};

/// A freshly attached session: its handle plus the receiver the socket
/// writer drains.
#[derive(Debug)]
pub struct Attached {
    pub handle: Arc<ConnectionHandle>,
    pub outbound: mpsc::Receiver<String>,
}

/// Owns every live session and delivers events to rooms.
#[derive(Debug)]
pub struct RealtimeGateway {
    config: RealtimeConfig,
    registry: Arc<ConnectionRegistry>,
    pool: ConnectionPool,
    rooms: RoomRegistry,
    metrics: GatewayMetrics,
    shutdown: CancellationToken,
}

impl RealtimeGateway {
    /// Creates a gateway over a shared connection registry.
    pub fn new(config: RealtimeConfig, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            config,
            registry,
            pool: ConnectionPool::new(),
            rooms: RoomRegistry::new(),
            metrics: GatewayMetrics::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Register an authenticated session.
    ///
    /// Joins the user and role rooms, closes the user's oldest sessions if
    /// the per-user limit would be exceeded, and queues `connected`.
    pub fn attach(&self, identity: SessionIdentity) -> Attached {
        let user_id = identity.user_id;
        let (handle, outbound) = ConnectionHandle::new(identity, self.config.channel_buffer_size);
        let handle = Arc::new(handle);

        let limit = self.config.max_connections_per_user.max(1);
        let existing = self.pool.user_connections(user_id);
        if existing.len() >= limit {
            let excess = existing.len() + 1 - limit;
            for oldest in existing.iter().take(excess) {
                warn!(
                    conn_id = %oldest.id,
                    user_id = %user_id,
                    max = limit,
                    "Session limit reached, closing oldest session"
                );
                self.metrics.connection_evicted();
                self.detach(oldest.id);
            }
        }

        self.pool.add(handle.clone());
        self.rooms.join(user_room(user_id), handle.id);
        let role = handle.identity.role;
        self.rooms.join(role_room(role.as_str()), handle.id);
        if self.registry.add(user_id, handle.id) {
            info!(user_id = %user_id, "User online");
        }
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            role = %handle.identity.role,
            "WebSocket connection registered"
        );

        self.send_to(
            &handle,
            names::CONNECTED,
            &Connected {
                message: "Connected to notification server".to_string(),
                user_id,
                user_name: handle.identity.name.clone(),
                user_role: handle.identity.role,
                socket_id: handle.id,
                timestamp: Utc::now(),
            },
        );

        Attached { handle, outbound }
    }

    /// Unregister a session and close it. Safe to call more than once.
    pub fn detach(&self, conn_id: ConnectionId) {
        let Some(handle) = self.pool.remove(conn_id) else {
            return;
        };
        handle.close();
        self.rooms.leave_all(conn_id);

        let user_id = handle.identity.user_id;
        if self.registry.remove(user_id, conn_id) {
            info!(user_id = %user_id, "User offline");
        }
        self.metrics.connection_closed();

        info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection unregistered");
    }

    /// Close every session of one user. Returns how many were closed.
    pub fn disconnect_user(&self, user_id: UserId) -> usize {
        let sessions = self.pool.user_connections(user_id);
        for handle in &sessions {
            self.detach(handle.id);
        }
        if !sessions.is_empty() {
            info!(user_id = %user_id, count = sessions.len(), "Closed sessions of user");
        }
        sessions.len()
    }

    /// Process one text frame from a session.
    pub async fn handle_inbound(&self, conn_id: ConnectionId, text: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };
        handle.touch();
        self.metrics.message_received();

        let message = match InboundMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "Rejected inbound frame");
                self.send_to(&handle, names::ERROR, &ErrorPayload::from(&e));
                return;
            }
        };

        let identity = &handle.identity;
        match message {
            InboundMessage::Ping => {
                self.send_to(&handle, names::PONG, &Pong {
                    timestamp: Utc::now(),
                });
            }
            InboundMessage::UserStatus { status } => {
                let update = UserStatusUpdate {
                    user_id: identity.user_id,
                    user_name: identity.name.clone(),
                    status,
                    timestamp: Utc::now(),
                };
                if let Some(payload) = encode(names::USER_STATUS_UPDATE, &update) {
                    let admins = role_room(UserRole::Admin.as_str());
                    self.deliver(&admins, names::USER_STATUS_UPDATE, payload);
                }
            }
            InboundMessage::TaskTyping { task_id, is_typing } => {
                let update = TypingUpdate {
                    user_id: identity.user_id,
                    user_name: identity.name.clone(),
                    task_id,
                    is_typing,
                };
                if let Some(payload) = encode(names::TYPING_UPDATE, &update) {
                    self.broadcast_except(conn_id, names::TYPING_UPDATE, payload);
                }
            }
        }
    }

    /// Close every session silent for longer than `max_idle`. Returns how
    /// many were closed.
    pub fn reap_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let idle: Vec<_> = self
            .pool
            .all()
            .into_iter()
            .filter(|h| h.idle_for(now) > max_idle)
            .collect();

        for handle in &idle {
            info!(
                conn_id = %handle.id,
                user_id = %handle.identity.user_id,
                "Closing idle session"
            );
            self.metrics.connection_evicted();
            self.detach(handle.id);
        }
        idle.len()
    }

    /// Start the idle reaper. It stops when the gateway shuts down.
    pub fn spawn_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let config = HeartbeatConfig {
            check_interval: Duration::from_secs(self.config.heartbeat_interval_seconds.max(1)),
            idle_timeout: Duration::from_secs(self.config.idle_timeout_seconds),
        };
        tokio::spawn(run_reaper(self.clone(), config))
    }

    /// Resolves once [`Self::shutdown`] has been called.
    pub fn shutdown_signal(&self) -> WaitForCancellationFuture<'_> {
        self.shutdown.cancelled()
    }

    /// Stop the reaper and close every session through the normal
    /// disconnect path.
    pub fn shutdown(&self) {
        info!("Shutting down realtime gateway");
        self.shutdown.cancel();
        let all = self.pool.all();
        for handle in &all {
            self.detach(handle.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.pool.len()
    }

    /// The registry this gateway maintains.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Current counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn send_to<T: Serialize>(&self, handle: &ConnectionHandle, event: &str, body: &T) {
        let Some(payload) = encode(event, body) else {
            return;
        };
        match Envelope::new(event, payload).to_text() {
            Ok(frame) => {
                self.record(handle.send(frame));
            }
            Err(e) => error!(event, error = %e, "Failed to serialize outbound frame"),
        }
    }

    /// Hand `payload` to every session in `room`. Returns how many accepted it.
    fn deliver(&self, room: &str, event: &str, payload: Value) -> usize {
        let members = self.rooms.members(room);
        if members.is_empty() {
            debug!(room, event, "No live sessions in room");
            return 0;
        }
        let Some(frame) = frame(event, payload) else {
            return 0;
        };

        members
            .into_iter()
            .filter_map(|conn_id| self.pool.get(conn_id))
            .filter(|handle| self.record(handle.send(frame.clone())))
            .count()
    }

    fn broadcast_except(&self, skip: ConnectionId, event: &str, payload: Value) -> usize {
        let Some(frame) = frame(event, payload) else {
            return 0;
        };
        self.pool
            .all()
            .into_iter()
            .filter(|handle| handle.id != skip)
            .filter(|handle| self.record(handle.send(frame.clone())))
            .count()
    }

    fn record(&self, outcome: SendOutcome) -> bool {
        match outcome {
            SendOutcome::Queued => {
                self.metrics.messages_sent(1);
                true
            }
            SendOutcome::Dropped => {
                self.metrics.message_dropped();
                false
            }
            SendOutcome::Closed => false,
        }
    }
}

fn encode<T: Serialize>(event: &str, body: &T) -> Option<Value> {
    serde_json::to_value(body)
        .map_err(|e| error!(event, error = %e, "Failed to encode event body"))
        .ok()
}

fn frame(event: &str, payload: Value) -> Option<String> {
    Envelope::new(event, payload)
        .to_text()
        .map_err(|e| error!(event, error = %e, "Failed to serialize outbound frame"))
        .ok()
}

#[async_trait]
impl EventPublisher for RealtimeGateway {
    async fn publish_to_user(&self, user_id: UserId, event: &str, payload: Value) -> usize {
        self.deliver(&user_room(user_id), event, payload)
    }

    async fn publish_to_role(&self, role: &str, event: &str, payload: Value) -> usize {
        self.deliver(&role_room(role), event, payload)
    }
}
