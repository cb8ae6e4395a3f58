//! # taskhub-realtime
//!
//! Real-time WebSocket gateway for TaskHub. Provides:
//!
//! - Handshake authentication from a `token` query parameter or bearer header
//! - The connection registry answering "is this user online?"
//! - Per-user and per-role rooms with addressed event delivery
//! - Ping, status and typing relays between live sessions
//! - Per-user session limits and an idle reaper
//!
//! The socket itself is driven by the HTTP layer; this crate only sees
//! connection handles and text frames.

pub mod connection;
pub mod gateway;
pub mod message;
pub mod metrics;
pub mod registry;
pub mod room;

pub use connection::authenticator::WsAuthenticator;
pub use connection::handle::ConnectionHandle;
pub use gateway::{Attached, RealtimeGateway};
pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use registry::ConnectionRegistry;
pub use room::RoomRegistry;
