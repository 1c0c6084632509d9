use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Health, ServiceInfo};

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod collections;
pub mod documents;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service info", body = crate::openapi::ServiceInfoResponse)))]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("collections", env!("CARGO_PKG_VERSION")))
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Collection and document routes, relative to the mount prefix.
fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/collections", get(collections::list_collections))
        .route(
            "/collections/:name",
            axum::routing::post(collections::create_collection).delete(collections::delete_collection),
        )
        .route(
            "/collections/:name/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/collections/:name/documents/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route("/collections/:name/documents/bulk", axum::routing::delete(documents::bulk_delete_documents))
        .route(
            "/collections/:name/documents/:id",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
}

/// Build the full application router. Collection routes are mounted under
/// `base_path` (`""` mounts them at the root).
pub fn build_router(state: AppState, cors: CorsLayer, base_path: &str) -> Router {
    // Public routes (info + health + docs)
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = if base_path.is_empty() {
        collection_routes()
    } else {
        Router::new().nest(base_path, collection_routes())
    };

    // Compose
    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
