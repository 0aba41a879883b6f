use super::{ColumnDef, ColumnType, PrimaryKey, Resource, TableDef};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const CUSTOMERS: TableDef = TableDef {
    name: "customers",
    primary_key: PrimaryKey::Serial,
    columns: &[
        ColumnDef::required("name", ColumnType::Text),
        ColumnDef::required("surname", ColumnType::Text),
        ColumnDef::required("email", ColumnType::Text).unique(),
    ],
    dependents: &[],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerInput {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl Resource for Customer {
    type Record = Customer;
    type Input = CustomerInput;

    const TABLE: &'static TableDef = &CUSTOMERS;
    const LABEL: &'static str = "Customer";
}
