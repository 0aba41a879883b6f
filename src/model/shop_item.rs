use super::{Category, ColumnDef, ColumnType, Dependent, PrimaryKey, Resource, TableDef};
use crate::service::relations;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

pub const SHOP_ITEMS: TableDef = TableDef {
    name: "shop_items",
    primary_key: PrimaryKey::Serial,
    columns: &[
        ColumnDef::required("title", ColumnType::Text),
        ColumnDef::optional("description", ColumnType::Text),
        ColumnDef::required("price", ColumnType::Real),
    ],
    dependents: &[Dependent {
        table: "shop_item_categories",
        column: "shop_item_id",
    }],
};

/// Join table for the ShopItem <-> Category many-to-many association.
pub const SHOP_ITEM_CATEGORIES: TableDef = TableDef {
    name: "shop_item_categories",
    primary_key: PrimaryKey::Composite(&["shop_item_id", "category_id"]),
    columns: &[
        ColumnDef::required("shop_item_id", ColumnType::Integer).references("shop_items"),
        ColumnDef::required("category_id", ColumnType::Integer).references("categories"),
    ],
    dependents: &[],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShopItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[sqlx(skip)]
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Writable fields of a shop item. A `categories` array in the body is ignored;
/// links are managed through `/shopitems/{id}/categories/{category_id}`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ShopItemInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

#[async_trait]
impl Resource for ShopItem {
    type Record = ShopItem;
    type Input = ShopItemInput;

    const TABLE: &'static TableDef = &SHOP_ITEMS;
    const LABEL: &'static str = "Shop item";

    async fn load_relations(pool: &SqlitePool, records: &mut [ShopItem]) -> Result<(), sqlx::Error> {
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let mut by_item = relations::categories_for_items(pool, &ids).await?;
        for record in records.iter_mut() {
            record.categories = by_item.remove(&record.id).unwrap_or_default();
        }
        Ok(())
    }
}
