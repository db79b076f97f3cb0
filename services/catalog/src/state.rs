//! Application state shared across handlers

use auth::{AuthState, repositories::UserStore};
use std::sync::Arc;
use std::time::Duration;

use crate::{catalog::CatalogEngine, repositories::BookStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub catalog: CatalogEngine,
}

impl AppState {
    pub fn new(
        auth: AuthState,
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        store_timeout: Duration,
    ) -> Self {
        let catalog = CatalogEngine::new(books.clone(), store_timeout);
        Self {
            auth,
            users,
            books,
            catalog,
        }
    }
}
