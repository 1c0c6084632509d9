use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use service::collection::{parse_document_id, Document, DocumentInput};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkDeleteQuery {
    /// Comma-separated document ids.
    pub ids: String,
}

#[utoipa::path(
    post, path = "/collections/{name}/documents/", tag = "documents",
    params(("name" = String, Path, description = "Collection name")),
    request_body = crate::openapi::DocumentInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::DocumentEnvelope),
        (status = 422, description = "Body is not {\"content\": {...}}", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create_document(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<DocumentInput>, JsonRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let Json(input) = payload?;
    let document = state.store.create_document(&name, input.content).await?;
    Ok(Json(json!({"message": "Document created successfully", "data": document})))
}

#[utoipa::path(
    get, path = "/collections/{name}/documents/", tag = "documents",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "All documents", body = [crate::openapi::DocumentDoc]),
        (status = 404, description = "Collection not found (strict mode)", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Document>>, JsonApiError> {
    Ok(Json(state.store.list_documents(&name).await?))
}

#[utoipa::path(
    get, path = "/collections/{name}/documents/{id}", tag = "documents",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Document id (UUID)")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::DocumentEnvelope),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, JsonApiError> {
    let id = parse_document_id(&id)?;
    let document = state.store.get_document(&name, id).await?;
    Ok(Json(json!({"data": document})))
}

#[utoipa::path(
    put, path = "/collections/{name}/documents/{id}", tag = "documents",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Document id (UUID)")
    ),
    request_body = crate::openapi::DocumentInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DocumentEnvelope),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update_document(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
    payload: Result<Json<DocumentInput>, JsonRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let id = parse_document_id(&id)?;
    let Json(input) = payload?;
    let document = state.store.update_document(&name, id, input.content).await?;
    Ok(Json(json!({"message": "Document updated successfully", "data": document})))
}

#[utoipa::path(
    delete, path = "/collections/{name}/documents/{id}", tag = "documents",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Document id (UUID)")
    ),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponse),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, JsonApiError> {
    let id = parse_document_id(&id)?;
    state.store.delete_document(&name, id).await?;
    Ok(Json(json!({"message": "Document deleted successfully"})))
}

#[utoipa::path(
    delete, path = "/collections/{name}/documents/bulk", tag = "documents",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("ids" = String, Query, description = "Comma-separated document ids; unknown or malformed ids are skipped")
    ),
    responses(
        (status = 200, description = "Number of documents removed", body = crate::openapi::BulkDeleteResponse),
        (status = 400, description = "Missing ids", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn bulk_delete_documents(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<BulkDeleteQuery>, QueryRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let Query(query) = query?;
    let deleted = state.store.bulk_delete_documents(&name, &query.ids).await?;
    Ok(Json(json!({"Deleted": deleted})))
}
