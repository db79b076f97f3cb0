//! Repositories for user persistence

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod user;

pub use user::{UserRepository, UserStore};
