//! Shared application state for all routes.

use sqlx::SqlitePool;

/// Storage handle injected into every handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        AppState { pool }
    }
}
