//! # taskhub-entity
//!
//! Domain entity models for TaskHub. Every struct in this crate represents
//! a database table row or a domain value object. Row types derive (or
//! implement) `sqlx::FromRow`.

pub mod notification;
pub mod task;
pub mod user;
