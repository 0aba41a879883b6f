use super::{ColumnDef, ColumnType, Dependent, PrimaryKey, Resource, TableDef};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const ORDERS: TableDef = TableDef {
    name: "orders",
    primary_key: PrimaryKey::Serial,
    columns: &[ColumnDef::required("customer_id", ColumnType::Integer).references("customers")],
    dependents: &[Dependent {
        table: "order_items",
        column: "order_id",
    }],
};

pub const ORDER_ITEMS: TableDef = TableDef {
    name: "order_items",
    primary_key: PrimaryKey::Serial,
    columns: &[
        ColumnDef::required("order_id", ColumnType::Integer).references("orders"),
        ColumnDef::required("shop_item_id", ColumnType::Integer).references("shop_items"),
        ColumnDef::required("quantity", ColumnType::Integer),
    ],
    dependents: &[],
};

/// An order placed by a customer. Its items live under `/orders/{id}/items`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
}

/// Nested `customer` and `items` objects in the body are ignored.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderInput {
    pub customer_id: i64,
}

impl Resource for Order {
    type Record = Order;
    type Input = OrderInput;

    const TABLE: &'static TableDef = &ORDERS;
    const LABEL: &'static str = "Order";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub shop_item_id: i64,
    pub quantity: i64,
}

/// Body of `POST /orders/{id}/items`; the order id comes from the path.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub shop_item_id: i64,
    pub quantity: i64,
}
