use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use service::collection::{CollectionStore, StorePolicy};
use service::storage::InMemoryBackend;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes;
use server::state::AppState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn build_app(policy: StorePolicy, base_path: &str) -> Router {
    let store = CollectionStore::new(Arc::new(InMemoryBackend::new()), policy);
    routes::build_router(AppState::new(store), cors(), base_path)
}

fn app() -> Router {
    build_app(StorePolicy::default(), "")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn timestamp(v: &Value) -> DateTime<Utc> {
    v.as_str().and_then(|s| s.parse().ok()).expect("rfc3339 timestamp")
}

#[tokio::test]
async fn root_and_health() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "collections");

    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let (status, body) = send(&app(), "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/collections/{name}/documents/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn orders_scenario() -> anyhow::Result<()> {
    let app = app();

    let (status, body) = send(&app, "POST", "/collections/orders", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap_or_default().contains("orders"));

    let (status, body) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": {"item": "pen"}}))).await?;
    assert_eq!(status, StatusCode::OK);
    let created = body["data"].clone();
    assert_eq!(created["syncRequired"], true);
    assert_eq!(created["content"], json!({"item": "pen"}));
    assert_eq!(created["createdOn"], created["updatedOn"]);
    let id = created["id"].as_str().expect("id").to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let uri = format!("/collections/orders/documents/{id}");
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"content": {"item": "pencil"}}))).await?;
    assert_eq!(status, StatusCode::OK);
    let updated = body["data"].clone();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdOn"], created["createdOn"]);
    assert_eq!(updated["syncRequired"], true);
    assert!(timestamp(&updated["updatedOn"]) > timestamp(&created["updatedOn"]));

    let (status, body) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], json!({"item": "pencil"}));

    let (status, _) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn duplicate_collection_is_rejected() -> anyhow::Result<()> {
    let app = app();
    let (status, _) = send(&app, "POST", "/collections/orders", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/collections/orders", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already Exists");

    let (status, body) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["orders"]));
    Ok(())
}

#[tokio::test]
async fn unsafe_collection_name_is_rejected() -> anyhow::Result<()> {
    let (status, body) = send(&app(), "POST", "/collections/orders.json", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_client_errors() -> anyhow::Result<()> {
    let app = app();
    for method in ["GET", "DELETE"] {
        let (status, body) = send(&app, method, "/collections/orders/documents/not-a-uuid", None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body["error"], "Invalid Identifier");
    }
    let (status, _) = send(&app, "PUT", "/collections/orders/documents/123", Some(json!({"content": {}}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // rejected before the store is touched, so nothing was auto-created
    let (status, body) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn bulk_route_only_accepts_delete() -> anyhow::Result<()> {
    let app = app();
    let (status, _) = send(&app, "GET", "/collections/orders/documents/bulk", None).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = send(&app, "PUT", "/collections/orders/documents/bulk", Some(json!({"content": {}}))).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (_, body) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn unknown_document_is_not_found() -> anyhow::Result<()> {
    let app = app();
    let uri = format!("/collections/orders/documents/{}", Uuid::new_v4());
    for (method, body) in [("GET", None), ("PUT", Some(json!({"content": {"a": 1}}))), ("DELETE", None)] {
        let (status, _) = send(&app, method, &uri, body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
    }
    Ok(())
}

#[tokio::test]
async fn content_must_be_an_object() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": [1, 2]}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid Body");

    let (status, _) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"item": "pen"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn documents_route_accepts_both_slash_forms() -> anyhow::Result<()> {
    let app = app();
    let (status, _) = send(&app, "POST", "/collections/orders/documents", Some(json!({"content": {"n": 1}}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": {"n": 2}}))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, with_slash) = send(&app, "GET", "/collections/orders/documents/", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, without_slash) = send(&app, "GET", "/collections/orders/documents", None).await?;
    assert_eq!(with_slash, without_slash);
    let docs = with_slash.as_array().expect("array");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["content"], json!({"n": 1}));
    assert_eq!(docs[1]["content"], json!({"n": 2}));
    for doc in docs {
        let keys: Vec<&String> = doc.as_object().expect("object").keys().collect();
        assert_eq!(keys.len(), 5);
    }
    Ok(())
}

#[tokio::test]
async fn bulk_delete_counts_existing_ids() -> anyhow::Result<()> {
    let app = app();
    let mut ids = Vec::new();
    for n in 0..3 {
        let (_, body) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": {"n": n}}))).await?;
        ids.push(body["data"]["id"].as_str().expect("id").to_string());
    }
    let uri = format!(
        "/collections/orders/documents/bulk?ids={},{},bogus,{}",
        ids[0],
        ids[1],
        Uuid::new_v4()
    );
    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Deleted"], 2);

    let (_, body) = send(&app, "GET", "/collections/orders/documents/", None).await?;
    let remaining: Vec<&str> = body.as_array().expect("array").iter().filter_map(|d| d["id"].as_str()).collect();
    assert_eq!(remaining, vec![ids[2].as_str()]);

    let (status, body) = send(&app, "DELETE", "/collections/orders/documents/bulk", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Query");
    Ok(())
}

#[tokio::test]
async fn delete_collection_then_list() -> anyhow::Result<()> {
    let app = app();
    send(&app, "POST", "/collections/orders", None).await?;
    send(&app, "POST", "/collections/users", None).await?;

    let (status, _) = send(&app, "DELETE", "/collections/orders", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(body["data"], json!(["users"]));

    let (status, body) = send(&app, "DELETE", "/collections/orders", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap_or_default().contains("collection"));
    Ok(())
}

#[tokio::test]
async fn strict_policy_requires_existing_collection() -> anyhow::Result<()> {
    let app = build_app(StorePolicy { auto_create: false }, "");
    let (status, body) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": {}}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap_or_default().contains("collection"));
    let (status, _) = send(&app, "GET", "/collections/orders/documents/", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(body["data"], json!([]));

    send(&app, "POST", "/collections/orders", None).await?;
    let (status, _) = send(&app, "POST", "/collections/orders/documents/", Some(json!({"content": {}}))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn routes_mount_under_base_path() -> anyhow::Result<()> {
    let app = build_app(StorePolicy::default(), "/domo/datastores/v1");
    let (status, _) = send(&app, "POST", "/domo/datastores/v1/collections/orders", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", "/domo/datastores/v1/collections", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["orders"]));

    let (status, _) = send(&app, "GET", "/collections", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // info and health stay at the root
    let (status, _) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
