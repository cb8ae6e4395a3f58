//! In-process store implementations backed by `dashmap`.
//!
//! Same observable semantics as the PostgreSQL repositories. Used by the
//! `memory` database provider and throughout the test suites.

pub mod notification;
pub mod task;
pub mod user;

pub use notification::MemoryNotificationStore;
pub use task::MemoryTaskStore;
pub use user::MemoryUserStore;

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic insertion counter used to break `created_at` ties so that
/// newest-first ordering is total.
#[derive(Debug, Default)]
pub(crate) struct Sequence(AtomicU64);

impl Sequence {
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}
