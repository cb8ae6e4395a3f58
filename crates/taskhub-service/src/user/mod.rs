//! Account creation, login, and profile management.

pub mod auth;
pub mod worker;

pub use auth::{AuthService, LoginRequest, LoginResponse, SignupRequest};
pub use worker::{CreateWorkerRequest, UpdateProfileRequest, UpdateWorkerRequest, WorkerService};
