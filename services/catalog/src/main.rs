use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod catalog;
mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use auth::{
    AuthState, CredentialVerifier, SessionConfig, SessionStore,
    repositories::{UserRepository, UserStore},
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use crate::{
    config::AppConfig,
    repositories::{BookRepository, BookStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting catalog service");

    let app_config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    // Initialize repositories
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
    let books: Arc<dyn BookStore> = Arc::new(BookRepository::new(pool));

    let session_config = SessionConfig::default();
    let sessions = SessionStore::new(&session_config);
    let auth = AuthState {
        sessions: sessions.clone(),
        verifier: CredentialVerifier::new(users.clone()),
        config: session_config,
    };

    // Expired sessions are already rejected on lookup; the sweep only reclaims memory
    let sweep_interval = app_config.session_sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sessions.cleanup_expired_sessions(Utc::now()).await;
        }
    });

    let app_state = AppState::new(auth, users, books, app_config.store_timeout());

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&app_config.bind_addr).await?;
    info!("Catalog service listening on {}", app_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
