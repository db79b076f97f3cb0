//! Storage plumbing shared by the catalog services
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! # async fn start() -> Result<(), common::error::DatabaseError> {
//! let pool = init_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! assert!(health_check(&pool).await?);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;
