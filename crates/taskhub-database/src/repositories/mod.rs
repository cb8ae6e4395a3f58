//! PostgreSQL implementations of the store traits.

pub mod notification;
pub mod task;
pub mod user;

pub use notification::NotificationRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
