//! Session configuration

use chrono::Duration;

/// Settings shared by session issuance, the session cookie and the gate
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Lifetime of a session from issuance
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            ttl: Duration::minutes(60),
        }
    }
}
