//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Role, User};

/// Server-held session record, keyed by its opaque token
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    /// Role at issuance; not revalidated against the user table
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: &User, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            issued_at,
            expires_at,
        }
    }

    /// A session is live strictly before its expiry instant
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Authenticated caller attached to a request by the authorization gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}
