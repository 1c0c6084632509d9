use axum::{extract::{Path, State}, Json};
use serde_json::{json, Value};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/collections/{name}", tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Created", body = crate::openapi::MessageResponse),
        (status = 400, description = "Already exists or invalid name", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    state.store.create_collection(&name).await?;
    Ok(Json(json!({"message": format!("Collection '{}' created successfully", name)})))
}

#[utoipa::path(
    get, path = "/collections", tag = "collections",
    responses((status = 200, description = "Collection names", body = crate::openapi::CollectionListResponse))
)]
pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Value>, JsonApiError> {
    let names = state.store.list_collections().await?;
    Ok(Json(json!({"data": names})))
}

#[utoipa::path(
    delete, path = "/collections/{name}", tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponse),
        (status = 404, description = "Collection not found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, JsonApiError> {
    state.store.delete_collection(&name).await?;
    Ok(Json(json!({"message": "Collection deleted successfully"})))
}
