//! Entity model: typed records, write inputs, and the static table catalogue that
//! both the migration and the SQL builder derive their statements from.

mod category;
mod customer;
mod order;
mod shop_item;

pub use category::{Category, CategoryInput, CATEGORIES};
pub use customer::{Customer, CustomerInput, CUSTOMERS};
pub use order::{Order, OrderInput, OrderItem, OrderItemInput, ORDERS, ORDER_ITEMS};
pub use shop_item::{ShopItem, ShopItemInput, SHOP_ITEMS, SHOP_ITEM_CATEGORIES};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

/// Name of the surrogate key column on every entity table.
pub const ID_COLUMN: &str = "id";

/// SQLite storage class of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Literal used as DEFAULT when a NOT NULL column is added to an existing table.
    pub fn zero_literal(self) -> &'static str {
        match self {
            ColumnType::Integer => "0",
            ColumnType::Real => "0.0",
            ColumnType::Text => "''",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    /// Referenced table (its `id` column) for foreign keys.
    pub references: Option<&'static str>,
}

impl ColumnDef {
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            nullable: false,
            unique: false,
            references: None,
        }
    }

    pub const fn optional(name: &'static str, ty: ColumnType) -> Self {
        ColumnDef {
            name,
            ty,
            nullable: true,
            unique: false,
            references: None,
        }
    }

    pub const fn unique(self) -> Self {
        ColumnDef { unique: true, ..self }
    }

    pub const fn references(self, table: &'static str) -> Self {
        ColumnDef {
            references: Some(table),
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub enum PrimaryKey {
    /// `id INTEGER PRIMARY KEY AUTOINCREMENT`, assigned by storage on insert.
    Serial,
    /// Composite key over the listed columns (join tables).
    Composite(&'static [&'static str]),
}

/// Rows in another table that are removed together with a parent row.
#[derive(Clone, Debug)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub primary_key: PrimaryKey,
    /// Declared columns, excluding the serial `id`.
    pub columns: &'static [ColumnDef],
    /// Deleted in the same transaction before the parent row.
    pub dependents: &'static [Dependent],
}

impl TableDef {
    pub fn is_serial(&self) -> bool {
        matches!(self.primary_key, PrimaryKey::Serial)
    }
}

/// Every table in creation order: referenced tables come first.
pub const TABLES: &[&TableDef] = &[
    &CUSTOMERS,
    &CATEGORIES,
    &SHOP_ITEMS,
    &ORDERS,
    &ORDER_ITEMS,
    &SHOP_ITEM_CATEGORIES,
];

/// Binds one entity to its table, its wire shapes and its read projection.
///
/// `Record` is what reads return; `Input` holds only the writable scalar fields and
/// is what Create and Update decode request bodies into, so nested relation fields
/// sent by a client are dropped before they reach storage.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Record: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static;
    type Input: DeserializeOwned + Serialize + Send + Sync + 'static;

    const TABLE: &'static TableDef;
    /// Capitalized singular used in messages, e.g. "Customer".
    const LABEL: &'static str;

    /// Relations included by List and Get (and on the records Create/Update return).
    async fn load_relations(_pool: &SqlitePool, _records: &mut [Self::Record]) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
