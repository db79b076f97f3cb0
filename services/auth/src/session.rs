//! In-process session store
//!
//! Maps opaque tokens to session records. Expiry is enforced when a token
//! is looked up; the periodic sweep only reclaims memory.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::SessionConfig;
use crate::credentials::digest;
use crate::models::{Session, User};

/// A freshly issued session and its token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Session store shared by every request
#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            ttl: config.ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Issue a session for `user` starting now
    pub async fn issue(&self, user: &User) -> IssuedSession {
        self.issue_at(user, Utc::now()).await
    }

    /// Issue a session for `user` starting at `now`
    ///
    /// Never replaces an existing record: on the (improbable) event of a
    /// token already being present, a new one is derived.
    pub async fn issue_at(&self, user: &User, now: DateTime<Utc>) -> IssuedSession {
        let session = Session::for_user(user, now, now + self.ttl);
        let mut sessions = self.sessions.write().await;

        loop {
            let token = derive_token(user, now);
            if let Entry::Vacant(slot) = sessions.entry(token) {
                let token = slot.key().clone();
                slot.insert(session.clone());
                info!("Issued session for user: {}", user.username);
                return IssuedSession { token, session };
            }
        }
    }

    /// Find the live session for `token`
    pub async fn lookup(&self, token: &str) -> Option<Session> {
        self.lookup_at(token, Utc::now()).await
    }

    /// Find the session for `token` if it is still live at `now`
    pub async fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|session| session.is_live_at(now))
            .cloned()
    }

    /// Remove the session for `token`; returns whether one was present
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            info!("Revoked session for user: {}", session.username);
        }
        removed.is_some()
    }

    /// Drop every record expired at `now`; returns how many were removed
    pub async fn cleanup_expired_sessions(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.is_live_at(now));
        let removed = before - sessions.len();

        if removed > 0 {
            info!("Cleaned up {} expired sessions", removed);
        }
        removed
    }

    /// Number of records held, expired or not
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Token from username, password digest, issue time and a random nonce
fn derive_token(user: &User, now: DateTime<Utc>) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp());
    let nonce: u64 = rand::random();
    digest(&format!(
        "{}{}{}{}",
        user.username, user.password_hash, nanos, nonce
    ))
}
