//! In-memory `UserStore` for tests

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::credentials::digest;
use crate::models::{NewUser, Role, User, UserAccess};

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with the given plaintext password
    pub async fn add(&self, username: &str, password: &str, role: Role, active: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role,
            full_name: format!("{} full name", username),
            password_hash: digest(password),
            active,
        };
        self.users.write().await.push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Conflict(format!(
                "username {} already exists",
                new_user.username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            role: Role::User,
            full_name: new_user.full_name.clone(),
            password_hash: new_user.password_hash.clone(),
            active: true,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_access(&self, id: Uuid, access: UserAccess) -> DatabaseResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = access.role;
                user.active = access.active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}
