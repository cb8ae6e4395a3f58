//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::warn;

use taskhub_auth::SessionIdentity;
use taskhub_core::types::ConnectionId;

/// Outcome of queueing a frame on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for the socket writer.
    Queued,
    /// The session's buffer was full; the frame was dropped.
    Dropped,
    /// The session is closed.
    Closed,
}

/// A handle to a single live session.
///
/// Holds the sender for pushing encoded frames to the socket writer, the
/// identity bound at handshake, and a token that ends the session when
/// cancelled.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID, exposed to the client as `socketId`.
    pub id: ConnectionId,
    /// Identity bound at handshake, fixed for the session's lifetime.
    pub identity: SessionIdentity,
    /// When the session was established.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    closed: CancellationToken,
    last_activity_ms: AtomicI64,
}

impl ConnectionHandle {
    /// Create a handle and the receiver its socket writer drains.
    pub fn new(identity: SessionIdentity, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let now = Utc::now();
        let handle = Self {
            id: ConnectionId::new(),
            identity,
            connected_at: now,
            sender,
            closed: CancellationToken::new(),
            last_activity_ms: AtomicI64::new(now.timestamp_millis()),
        };
        (handle, receiver)
    }

    /// Queue an encoded frame without waiting.
    pub fn send(&self, frame: String) -> SendOutcome {
        if self.is_closed() {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => SendOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping message");
                SendOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                SendOutcome::Closed
            }
        }
    }

    /// End the session. The socket task observes this through [`Self::closed`].
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the session is closed.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }

    /// Record inbound activity.
    pub fn touch(&self) {
        self.last_activity_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Time of the last inbound frame (or the handshake).
    pub fn last_activity(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_activity_ms.load(Ordering::Relaxed))
            .unwrap_or(self.connected_at)
    }

    /// How long the session has been silent as of `now`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_activity()).to_std().unwrap_or_default()
    }
}
