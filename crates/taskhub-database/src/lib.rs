//! # taskhub-database
//!
//! Persistence for TaskHub: the store traits consumed by the service layer,
//! their PostgreSQL implementations, in-memory implementations with the same
//! semantics, and connection/migration management.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use provider::Stores;
pub use store::{NotificationStore, TaskFilter, TaskStore, UserStore};
