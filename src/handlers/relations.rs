//! Order items and shop item <-> category links.

use super::resource::{decode_body, not_found, parse_id};
use crate::error::AppError;
use crate::model::{Category, Order, OrderItemInput, ShopItem};
use crate::response;
use crate::service::{relations, CrudService};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
};

async fn existing_order(state: &AppState, id_str: &str) -> Result<i64, AppError> {
    let id = parse_id(id_str)?;
    if !CrudService::exists::<Order>(&state.pool, id).await? {
        return Err(not_found("Order"));
    }
    Ok(id)
}

pub async fn list_order_items(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order_id = existing_order(&state, &id_str).await?;
    let items = relations::items_of_order(&state.pool, order_id).await?;
    Ok(response::ok(items))
}

pub async fn add_order_item(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let order_id = existing_order(&state, &id_str).await?;
    let input: OrderItemInput = decode_body(&body)?;
    let item = relations::add_order_item(&state.pool, order_id, &input)
        .await
        .map_err(|e| AppError::internal("Failed to add order item", e))?;
    Ok(response::created(item))
}

pub async fn remove_order_item(
    State(state): State<AppState>,
    Path((id_str, item_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let order_id = existing_order(&state, &id_str).await?;
    let item_id = parse_id(&item_str)?;
    let removed = relations::remove_order_item(&state.pool, order_id, item_id)
        .await
        .map_err(|e| AppError::internal("Failed to delete order item", e))?;
    tracing::debug!(order_id, item_id, removed, "remove order item");
    Ok(response::message("Order item deleted successfully"))
}

async fn shop_item_with_categories(state: &AppState, id: i64) -> Result<ShopItem, AppError> {
    CrudService::read::<ShopItem>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shop item"))
}

/// Idempotent: linking an already linked category returns the item unchanged.
pub async fn link_category(
    State(state): State<AppState>,
    Path((id_str, category_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let item_id = parse_id(&id_str)?;
    let category_id = parse_id(&category_str)?;
    if !CrudService::exists::<ShopItem>(&state.pool, item_id).await? {
        return Err(not_found("Shop item"));
    }
    if !CrudService::exists::<Category>(&state.pool, category_id).await? {
        return Err(not_found("Category"));
    }
    relations::link_category(&state.pool, item_id, category_id)
        .await
        .map_err(|e| AppError::internal("Failed to link category", e))?;
    Ok(response::ok(shop_item_with_categories(&state, item_id).await?))
}

pub async fn unlink_category(
    State(state): State<AppState>,
    Path((id_str, category_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let item_id = parse_id(&id_str)?;
    let category_id = parse_id(&category_str)?;
    if !CrudService::exists::<ShopItem>(&state.pool, item_id).await? {
        return Err(not_found("Shop item"));
    }
    relations::unlink_category(&state.pool, item_id, category_id)
        .await
        .map_err(|e| AppError::internal("Failed to unlink category", e))?;
    Ok(response::ok(shop_item_with_categories(&state, item_id).await?))
}
