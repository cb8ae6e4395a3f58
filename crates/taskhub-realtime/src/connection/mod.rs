//! Live session handles, the session pool, handshake authentication and
//! the idle reaper.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod pool;
