//! User model and related functionality

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
}

/// New user creation payload; accounts always start as active `USER`s
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Administrator-controlled access settings of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAccess {
    pub role: Role,
    pub active: bool,
}

/// Login form fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Signup form fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: Option<String>,
    #[serde(rename = "fullName", alias = "full_name")]
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
}
