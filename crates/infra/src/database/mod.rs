//! Database implementations

pub mod health;
pub mod manager;
pub mod session_repository;
pub mod user_repository;

pub use health::*;
pub use manager::*;
pub use session_repository::*;
pub use user_repository::*;
