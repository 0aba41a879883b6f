use super::{ColumnDef, ColumnType, Dependent, PrimaryKey, Resource, TableDef};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const CATEGORIES: TableDef = TableDef {
    name: "categories",
    primary_key: PrimaryKey::Serial,
    columns: &[
        ColumnDef::required("title", ColumnType::Text),
        ColumnDef::optional("description", ColumnType::Text),
    ],
    dependents: &[Dependent {
        table: "shop_item_categories",
        column: "category_id",
    }],
};

/// A shop item category. `title` is the natural key used by seeding; it is not unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Resource for Category {
    type Record = Category;
    type Input = CategoryInput;

    const TABLE: &'static TableDef = &CATEGORIES;
    const LABEL: &'static str = "Category";
}
