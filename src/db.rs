//! Open the SQLite pool the handlers share.

use crate::settings::Settings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 5;

/// Open (creating if missing) the database named by the settings, with foreign keys enforced.
/// `:memory:` yields a single-connection pool so every request sees the same database.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, sqlx::Error> {
    if settings.is_in_memory() {
        return connect_in_memory().await;
    }
    let options = SqliteConnectOptions::new()
        .filename(&settings.database_path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;
    tracing::info!(path = %settings.database_path, "database opened");
    Ok(pool)
}

/// A private in-memory database. The one connection is never recycled, since
/// closing it would drop the data.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
