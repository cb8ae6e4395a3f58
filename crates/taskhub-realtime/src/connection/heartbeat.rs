//! Idle reaper for silent sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::gateway::RealtimeGateway;

/// Reaper settings.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// How often sessions are checked.
    pub check_interval: Duration,
    /// Silence after which a session is closed.
    pub idle_timeout: Duration,
}

/// Close sessions that have sent nothing for longer than the idle timeout,
/// until the gateway shuts down.
pub async fn run_reaper(gateway: Arc<RealtimeGateway>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.check_interval);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = gateway.shutdown_signal() => break,
            _ = interval.tick() => {
                let reaped = gateway.reap_idle(config.idle_timeout);
                if reaped > 0 {
                    debug!(reaped, "Idle sessions closed");
                }
            }
        }
    }

    debug!("Idle reaper stopped");
}
