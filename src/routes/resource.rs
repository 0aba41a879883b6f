//! The route table under `/api/v1`: five routes per resource group, plus the
//! relation sub-routes for order items and category links.

use crate::handlers::{
    add_order_item, create, delete, link_category, list, list_order_items, read, remove_order_item, unlink_category,
    update,
};
use crate::model::{Category, Customer, Order, Resource, ShopItem};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

/// `GET|POST /{segment}` and `GET|PUT|DELETE /{segment}/:id` for one resource.
pub fn resource_routes<R: Resource>(segment: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("/{}", segment), get(list::<R>).post(create::<R>))
        .route(
            &format!("/{}/:id", segment),
            get(read::<R>).put(update::<R>).delete(delete::<R>),
        )
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Customer>("customers"))
        .merge(resource_routes::<Category>("categories"))
        .merge(resource_routes::<ShopItem>("shopitems"))
        .merge(resource_routes::<Order>("orders"))
        .route("/orders/:id/items", get(list_order_items).post(add_order_item))
        .route("/orders/:id/items/:item_id", axum::routing::delete(remove_order_item))
        .route(
            "/shopitems/:id/categories/:category_id",
            put(link_category).delete(unlink_category),
        )
        .route("/openapi.json", get(openapi_json))
}
