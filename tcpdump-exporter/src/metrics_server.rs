use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::{aggregator::Aggregator, output};

pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .with_state(aggregator)
}

/// Binds the scrape endpoint on all interfaces.
pub async fn bind(port: u16) -> Result<TcpListener, anyhow::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {}", addr))?;
    info!("Serving metrics on http://{}/metrics", addr);
    Ok(listener)
}

/// Serves scrapes from `listener` until the task is aborted.
pub async fn serve(listener: TcpListener, aggregator: Arc<Aggregator>) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(aggregator))
        .await
        .context("Metrics server failed")?;
    Ok(())
}

async fn metrics(State(aggregator): State<Arc<Aggregator>>) -> impl IntoResponse {
    let body = output::render_metrics(&aggregator.snapshot());
    ([(header::CONTENT_TYPE, output::CONTENT_TYPE)], body)
}

async fn health_check() -> &'static str {
    "ok"
}
