//! Generic CRUD execution against SQLite.

use crate::model::{Resource, TableDef};
use crate::sql::{self, column_values, BindValue};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

pub struct CrudService;

impl CrudService {
    /// All rows, with the resource's relations attached.
    pub async fn list<R: Resource>(pool: &SqlitePool) -> Result<Vec<R::Record>, sqlx::Error> {
        let mut rows = fetch_all::<R::Record>(pool, &sql::select_all(R::TABLE), Vec::new()).await?;
        R::load_relations(pool, &mut rows).await?;
        Ok(rows)
    }

    /// Fetch one row by primary key, with relations attached.
    pub async fn read<R: Resource>(pool: &SqlitePool, id: i64) -> Result<Option<R::Record>, sqlx::Error> {
        let row = fetch_optional::<R::Record>(pool, &sql::select_by_id(R::TABLE), vec![id.into()]).await?;
        Self::with_relations::<R>(pool, row).await
    }

    /// Whether a row with this id exists, without loading relations.
    pub async fn exists<R: Resource>(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        row_exists(pool, R::TABLE, id).await
    }

    /// Insert one row from the input's scalar fields. Returns the stored row with its new id.
    pub async fn create<R: Resource>(pool: &SqlitePool, input: &R::Input) -> Result<R::Record, sqlx::Error> {
        let row = insert_returning::<R::Record, _>(pool, R::TABLE, input).await?;
        let mut rows = vec![row];
        R::load_relations(pool, &mut rows).await?;
        rows.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace every writable column of one row. `None` when no row has that id.
    pub async fn update<R: Resource>(
        pool: &SqlitePool,
        id: i64,
        input: &R::Input,
    ) -> Result<Option<R::Record>, sqlx::Error> {
        let mut params = column_values(R::TABLE, input)?;
        params.push(id.into());
        let row = fetch_optional::<R::Record>(pool, &sql::update(R::TABLE), params).await?;
        Self::with_relations::<R>(pool, row).await
    }

    /// Delete one row by id, removing its dependent rows first in the same transaction.
    /// Returns the number of parent rows removed (zero for an unknown id).
    pub async fn delete<R: Resource>(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        delete_cascading(pool, R::TABLE, id).await
    }

    async fn with_relations<R: Resource>(
        pool: &SqlitePool,
        row: Option<R::Record>,
    ) -> Result<Option<R::Record>, sqlx::Error> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut rows = vec![row];
        R::load_relations(pool, &mut rows).await?;
        Ok(rows.pop())
    }
}

/// Insert a row into any serial table from a serializable input.
pub async fn insert_returning<T, I>(pool: &SqlitePool, table: &TableDef, input: &I) -> Result<T, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    I: serde::Serialize,
{
    let params = column_values(table, input)?;
    let q = sql::insert(table);
    tracing::debug!(sql = %q, params = ?params, "query");
    let mut query = sqlx::query_as::<_, T>(&q);
    for p in params {
        query = query.bind(p);
    }
    query.fetch_one(pool).await
}

pub async fn row_exists(pool: &SqlitePool, table: &TableDef, id: i64) -> Result<bool, sqlx::Error> {
    let q = sql::select_exists(table);
    tracing::debug!(sql = %q, id, "query");
    let found: Option<i64> = sqlx::query_scalar(&q).bind(id).fetch_optional(pool).await?;
    Ok(found.is_some())
}

pub async fn delete_cascading(pool: &SqlitePool, table: &TableDef, id: i64) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    for dep in table.dependents {
        let q = sql::delete_dependents(dep);
        tracing::debug!(sql = %q, id, "query (tx)");
        let removed = sqlx::query(&q).bind(id).execute(&mut *tx).await?.rows_affected();
        if removed > 0 {
            tracing::debug!(table = dep.table, removed, "removed dependent rows");
        }
    }
    let q = sql::delete_by_id(table);
    tracing::debug!(sql = %q, id, "query (tx)");
    let deleted = sqlx::query(&q).bind(id).execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;
    Ok(deleted)
}

pub async fn fetch_all<T>(pool: &SqlitePool, q: &str, params: Vec<BindValue>) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    tracing::debug!(sql = %q, params = ?params, "query");
    let mut query = sqlx::query_as::<_, T>(q);
    for p in params {
        query = query.bind(p);
    }
    query.fetch_all(pool).await
}

pub async fn fetch_optional<T>(pool: &SqlitePool, q: &str, params: Vec<BindValue>) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    tracing::debug!(sql = %q, params = ?params, "query");
    let mut query = sqlx::query_as::<_, T>(q);
    for p in params {
        query = query.bind(p);
    }
    query.fetch_optional(pool).await
}

pub async fn execute(pool: &SqlitePool, q: &str, params: Vec<BindValue>) -> Result<u64, sqlx::Error> {
    tracing::debug!(sql = %q, params = ?params, "query");
    let mut query = sqlx::query(q);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.execute(pool).await?.rows_affected())
}
