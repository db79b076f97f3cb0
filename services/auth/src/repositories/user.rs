//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, Role, User, UserAccess};

/// Persistence operations the authentication core needs for accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account, active or not, by its username
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    /// Insert an active `USER` account; a taken username yields `DatabaseError::Conflict`
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User>;

    async fn list(&self) -> DatabaseResult<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Returns false when no such account exists
    async fn update_access(&self, id: Uuid, access: UserAccess) -> DatabaseResult<bool>;

    /// Returns false when no such account exists
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// User repository backed by PostgreSQL
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> DatabaseResult<User> {
    let role: String = row.try_get("role").map_err(DatabaseError::Query)?;
    let role: Role = role
        .parse()
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))?;

    Ok(User {
        id: row.try_get("user_id").map_err(DatabaseError::Query)?,
        username: row.try_get("username").map_err(DatabaseError::Query)?,
        role,
        full_name: row.try_get("full_name").map_err(DatabaseError::Query)?,
        password_hash: row.try_get("hashed_password").map_err(DatabaseError::Query)?,
        active: row.try_get("active").map_err(DatabaseError::Query)?,
    })
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by username: {}", username);

        let row = sqlx::query(
            r#"
            SELECT user_id, username, role, full_name, hashed_password, active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.username);

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, role, full_name, hashed_password, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING user_id, username, role, full_name, hashed_password, active
            "#,
        )
        .bind(&new_user.username)
        .bind(Role::User.as_str())
        .bind(&new_user.full_name)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        user_from_row(&row)
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, username, role, full_name, hashed_password, active
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT user_id, username, role, full_name, hashed_password, active
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_access(&self, id: Uuid, access: UserAccess) -> DatabaseResult<bool> {
        info!(
            "Updating access of user {}: role={}, active={}",
            id, access.role, access.active
        );

        let result = sqlx::query("UPDATE users SET role = $1, active = $2 WHERE user_id = $3")
            .bind(access.role.as_str())
            .bind(access.active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
