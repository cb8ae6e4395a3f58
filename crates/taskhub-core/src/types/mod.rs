//! Core type definitions used across the TaskHub workspace.

pub mod id;
pub mod pagination;
pub mod response;

pub use id::*;
pub use pagination::{PageInfo, PageRequest};
pub use response::ApiErrorResponse;
