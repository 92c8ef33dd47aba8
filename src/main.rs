use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use client_provider::backend::MemoryBackend;
use client_provider::http::handlers::HttpState;
use client_provider::http::routes::build_router;
use client_provider::telemetry::{init_tracing, Telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(None);
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;

    // example data so a local instance answers something; real deployments
    // wire their own collaborators into HttpState
    let backend = MemoryBackend::new();
    backend.insert_client("ACME", "en").await;
    backend.insert_client("GLOBEX", "de").await;
    backend.insert_counterparty("ACME", json!("ACME-CP")).await;

    let telemetry = Telemetry::new();
    let state = Arc::new(HttpState {
        getter: Arc::new(backend.clone()),
        counterparty: Arc::new(backend.clone()),
        tf: Arc::new(backend),
        telemetry,
    });

    let app = build_router(state);
    info!(%addr, "starting client provider");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
