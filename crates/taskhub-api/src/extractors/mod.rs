//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;
pub mod query;

pub use auth::{AdminUser, AuthUser};
pub use json::ApiJson;
pub use path::parse_id;
pub use query::ApiQuery;
