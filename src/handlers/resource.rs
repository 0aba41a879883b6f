//! The five resource operations, generic over the entity: list, read, create, update, delete.

use crate::error::AppError;
use crate::model::Resource;
use crate::response;
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::de::DeserializeOwned;

/// Path ids are positive integers; anything else is a bad request.
pub fn parse_id(id_str: &str) -> Result<i64, AppError> {
    match id_str.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::BadRequest("Invalid ID".into())),
    }
}

/// Decode a JSON body into the given shape. Unknown fields are ignored.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))
}

pub fn not_found(label: &str) -> AppError {
    AppError::NotFound(format!("{} not found", label))
}

pub async fn list<R: Resource>(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = CrudService::list::<R>(&state.pool).await?;
    Ok(response::ok(rows))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = CrudService::read::<R>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(R::LABEL))?;
    Ok(response::ok(row))
}

pub async fn create<R: Resource>(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse, AppError> {
    let input: R::Input = decode_body(&body)?;
    let row = CrudService::create::<R>(&state.pool, &input)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create {}", R::LABEL.to_lowercase()), e))?;
    Ok(response::created(row))
}

/// Full replace: the id is checked first, then existence, then the body.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !CrudService::exists::<R>(&state.pool, id).await? {
        return Err(not_found(R::LABEL));
    }
    let input: R::Input = decode_body(&body)?;
    let row = CrudService::update::<R>(&state.pool, id, &input)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update {}", R::LABEL.to_lowercase()), e))?
        .ok_or_else(|| not_found(R::LABEL))?;
    Ok(response::ok(row))
}

/// Succeeds whether or not the id existed.
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let deleted = CrudService::delete::<R>(&state.pool, id)
        .await
        .map_err(|e| AppError::internal(format!("Failed to delete {}", R::LABEL.to_lowercase()), e))?;
    tracing::debug!(table = R::TABLE.name, id, deleted, "delete");
    Ok(response::message(format!("{} deleted successfully", R::LABEL)))
}
