use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;
use service::{
    collection::{CollectionStore, StorePolicy},
    runtime,
    storage::JsonFileBackend,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the router over the file-backed store described by `cfg`.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.storage.data_dir).await?;

    // 每个集合持久化为 data_dir 下的一个 JSON 文件
    let backend = JsonFileBackend::new(cfg.storage.data_dir.clone()).await?;
    let store = CollectionStore::new(backend, StorePolicy { auto_create: cfg.storage.auto_create });
    let state = AppState::new(store);

    Ok(routes::build_router(state, build_cors(), &cfg.server.base_path))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
/// Logging and config loading are the caller's job.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    // Bind and serve
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        base_path = %cfg.server.base_path,
        data_dir = %cfg.storage.data_dir.display(),
        auto_create = cfg.storage.auto_create,
        "starting collections server"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
