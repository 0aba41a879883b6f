//! OpenAPI description of the wire shapes, served at `/api/v1/openapi.json`.

use crate::error::ErrorBody;
use crate::model::{
    Category, CategoryInput, Customer, CustomerInput, Order, OrderInput, OrderItem, OrderItemInput, ShopItem,
    ShopItemInput,
};
use crate::response::MessageBody;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "shop-api", description = "Customers, categories, shop items and orders"),
    components(schemas(
        Customer,
        CustomerInput,
        Category,
        CategoryInput,
        ShopItem,
        ShopItemInput,
        Order,
        OrderInput,
        OrderItem,
        OrderItemInput,
        ErrorBody,
        MessageBody
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
