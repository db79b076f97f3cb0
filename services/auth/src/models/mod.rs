//! Authentication service models

pub mod role;
pub mod session;
pub mod user;

// Re-export for convenience
pub use role::{Role, UnknownRole};
pub use session::{Principal, Session};
pub use user::{LoginForm, NewUser, SignupForm, User, UserAccess};
