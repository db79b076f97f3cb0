//! Session and authorization core of the Biblio catalog
//!
//! - [`credentials`]: password digests and login verification
//! - [`session`]: the in-process session store
//! - [`middleware`]: the role-checking authorization gate
//! - [`routes`]: login, signup and logout endpoints

pub mod config;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod validation;

pub use config::SessionConfig;
pub use credentials::CredentialVerifier;
pub use error::{AuthError, AuthResult};
pub use middleware::{FORBIDDEN_PATH, Gate, GateRejection, LOGIN_PATH};
pub use models::{Principal, Role};
pub use session::SessionStore;

/// State shared by the authentication endpoints
#[derive(Clone)]
pub struct AuthState {
    pub sessions: SessionStore,
    pub verifier: CredentialVerifier,
    pub config: SessionConfig,
}

impl AuthState {
    /// Gate admitting only sessions holding `role`
    pub fn gate(&self, role: Role) -> Gate {
        Gate::new(self.sessions.clone(), self.config.cookie_name.clone(), role)
    }
}
