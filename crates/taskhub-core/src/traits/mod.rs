//! Core traits defined in `taskhub-core` and implemented by other crates.

pub mod publisher;

pub use publisher::{EventPublisher, events};
