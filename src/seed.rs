//! Baseline records inserted at startup. Each insert is conditional on its natural
//! key (email for customers, title for categories and shop items), so running the
//! loader on every start never duplicates data.

use crate::error::AppError;
use crate::model::{
    CategoryInput, CustomerInput, ShopItemInput, TableDef, CATEGORIES, CUSTOMERS, SHOP_ITEMS, SHOP_ITEM_CATEGORIES,
};
use crate::sql::{self, column_values, BindValue};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};

struct SeedItem {
    input: ShopItemInput,
    category: &'static str,
}

fn customers() -> Vec<CustomerInput> {
    vec![
        CustomerInput {
            name: "John".into(),
            surname: "Doe".into(),
            email: "john.doe@example.com".into(),
        },
        CustomerInput {
            name: "Jane".into(),
            surname: "Smith".into(),
            email: "jane.smith@example.com".into(),
        },
    ]
}

fn categories() -> Vec<CategoryInput> {
    vec![
        CategoryInput {
            title: "Electronics".into(),
            description: Some("Electronic devices and gadgets.".into()),
        },
        CategoryInput {
            title: "Books".into(),
            description: Some("Literature, fiction, and non-fiction books.".into()),
        },
    ]
}

fn shop_items() -> Vec<SeedItem> {
    vec![
        SeedItem {
            input: ShopItemInput {
                title: "Smartphone".into(),
                description: Some("Latest smartphone with modern features.".into()),
                price: 699.99,
            },
            category: "Electronics",
        },
        SeedItem {
            input: ShopItemInput {
                title: "Science Fiction Novel".into(),
                description: Some("A thrilling sci-fi adventure.".into()),
                price: 19.99,
            },
            category: "Books",
        },
    ]
}

/// Counts of rows actually inserted by one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub customers: u64,
    pub categories: u64,
    pub shop_items: u64,
    pub links: u64,
}

/// Insert the baseline dataset in one transaction. Must run after the migration.
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport, AppError> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    for c in customers() {
        report.customers += insert_if_absent(&mut tx, &CUSTOMERS, "email", &c.email, &c).await?;
    }
    for c in categories() {
        report.categories += insert_if_absent(&mut tx, &CATEGORIES, "title", &c.title, &c).await?;
    }
    let link = sql::insert_link_by_titles(&SHOP_ITEM_CATEGORIES, &SHOP_ITEMS, &CATEGORIES);
    for item in shop_items() {
        report.shop_items += insert_if_absent(&mut tx, &SHOP_ITEMS, "title", &item.input.title, &item.input).await?;
        tracing::debug!(sql = %link, "query (tx)");
        report.links += sqlx::query(&link)
            .bind(item.input.title.as_str())
            .bind(item.category)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    tracing::info!(
        customers = report.customers,
        categories = report.categories,
        shop_items = report.shop_items,
        links = report.links,
        "seed applied"
    );
    Ok(report)
}

async fn insert_if_absent<I: Serialize>(
    tx: &mut Transaction<'_, Sqlite>,
    table: &TableDef,
    natural_key: &str,
    key_value: &str,
    input: &I,
) -> Result<u64, AppError> {
    let q = sql::insert_if_absent(table, natural_key);
    let mut params = column_values(table, input)?;
    params.push(BindValue::from(key_value));
    tracing::debug!(sql = %q, params = ?params, "query (tx)");
    let mut query = sqlx::query(&q);
    for p in params {
        query = query.bind(p);
    }
    Ok(query.execute(&mut **tx).await?.rows_affected())
}
