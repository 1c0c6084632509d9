use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ServiceInfoResponse { pub service: String, pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String, pub detail: Option<String> }

#[derive(ToSchema)]
pub struct CollectionListResponse { pub data: Vec<String> }

#[derive(ToSchema)]
pub struct DocumentInputDoc {
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DocumentDoc {
    pub id: Uuid,
    /// RFC 3339 UTC timestamp
    pub created_on: String,
    /// RFC 3339 UTC timestamp
    pub updated_on: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    pub sync_required: bool,
}

/// `{"data": ...}`, with `message` on writes.
#[derive(ToSchema)]
pub struct DocumentEnvelope {
    pub message: Option<String>,
    pub data: DocumentDoc,
}

#[derive(ToSchema)]
pub struct BulkDeleteResponse {
    #[schema(rename = "Deleted")]
    pub deleted: usize,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::collections::create_collection,
        crate::routes::collections::list_collections,
        crate::routes::collections::delete_collection,
        crate::routes::documents::create_document,
        crate::routes::documents::list_documents,
        crate::routes::documents::get_document,
        crate::routes::documents::update_document,
        crate::routes::documents::delete_document,
        crate::routes::documents::bulk_delete_documents,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceInfoResponse,
            MessageResponse,
            ErrorResponse,
            CollectionListResponse,
            DocumentInputDoc,
            DocumentDoc,
            DocumentEnvelope,
            BulkDeleteResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "collections"),
        (name = "documents")
    )
)]
pub struct ApiDoc;
