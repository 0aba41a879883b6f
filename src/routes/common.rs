//! Common routes: health, readiness, version.

use crate::model::TABLES;
use crate::sql;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
    /// Catalogue tables not present in the database.
    missing_tables: Vec<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn missing_tables(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut missing = Vec::new();
    for table in TABLES {
        let cols = sqlx::query_scalar::<_, String>(&sql::table_info(table))
            .fetch_all(pool)
            .await?;
        if cols.is_empty() {
            missing.push(table.name);
        }
    }
    Ok(missing)
}

/// Ready once the database answers and every catalogue table exists.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    match missing_tables(&state.pool).await {
        Ok(missing) if missing.is_empty() => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ok",
                database: "ok",
                missing_tables: missing,
            }),
        ),
        Ok(missing) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "ok",
                missing_tables: missing,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    database: "unavailable",
                    missing_tables: Vec::new(),
                }),
            )
        }
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "tables": TABLES.iter().map(|t| t.name).collect::<Vec<_>>()
    }))
}

pub fn common_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
}
