//! Credential verification
//!
//! Passwords are stored as an unsalted, deterministic SHA-256 digest
//! (lowercase hex). The same function derives session tokens.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};
use crate::models::{NewUser, User};
use crate::repositories::UserStore;
use crate::validation::ValidSignup;

/// Deterministic one-way digest of `input`
pub fn digest(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Constant-time byte comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Checks login credentials and registers new accounts
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Verify a username/password pair
    ///
    /// Unknown users and wrong passwords both fail with
    /// `AuthenticationFailure`. An inactive account with the right password
    /// fails with `AccountInactive`.
    pub async fn verify_login(&self, username: &str, password: &str) -> AuthResult<User> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AuthenticationFailure)?;

        if !constant_time_eq(digest(password).as_bytes(), user.password_hash.as_bytes()) {
            return Err(AuthError::AuthenticationFailure);
        }

        if !user.active {
            warn!("Login refused for blocked account: {}", username);
            return Err(AuthError::AccountInactive);
        }

        Ok(user)
    }

    /// Create an active `USER` account from a validated signup form
    pub async fn register(&self, signup: ValidSignup<'_>) -> AuthResult<User> {
        let new_user = NewUser {
            username: signup.username.to_string(),
            full_name: signup.full_name.to_string(),
            password_hash: digest(signup.password),
        };

        match self.users.insert(&new_user).await {
            Ok(user) => {
                info!("Registered user: {}", user.username);
                Ok(user)
            }
            Err(common::error::DatabaseError::Conflict(_)) => Err(AuthError::Validation(
                format!("Username {} is already taken", new_user.username),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
