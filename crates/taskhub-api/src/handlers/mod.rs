//! HTTP request handlers, grouped by route prefix.

pub mod admin;
pub mod auth;
pub mod health;
pub mod notification;
pub mod worker;
pub mod ws;
