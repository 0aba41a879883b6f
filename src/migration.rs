//! Bring the database schema in line with the table catalogue: CREATE TABLE for
//! missing tables, ADD COLUMN for declared columns an existing table lacks.
//! Order follows foreign-key dependencies (see `model::TABLES`). Idempotent.

use crate::error::AppError;
use crate::model::{TableDef, TABLES};
use crate::sql;
use sqlx::SqlitePool;
use std::collections::HashSet;

pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    for table in TABLES {
        ensure_table(pool, table).await?;
    }
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

async fn ensure_table(pool: &SqlitePool, table: &TableDef) -> Result<(), AppError> {
    let existing: HashSet<String> = sqlx::query_scalar::<_, String>(&sql::table_info(table))
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();

    if existing.is_empty() {
        let ddl = sql::create_table(table);
        tracing::debug!(sql = %ddl, "create table");
        sqlx::query(&ddl).execute(pool).await?;
        return Ok(());
    }

    for c in table.columns {
        if existing.contains(c.name) {
            continue;
        }
        let ddl = sql::add_column(table, c);
        tracing::info!(table = table.name, column = c.name, "adding missing column");
        sqlx::query(&ddl).execute(pool).await?;
        if c.unique {
            let index = sql::create_unique_index(table, c);
            tracing::debug!(sql = %index, "create unique index");
            sqlx::query(&index).execute(pool).await?;
        }
    }
    Ok(())
}
