use anyhow::Result;
use axum::{routing::get, Router};
use log::info;

/// Hosting platforms probe this route to decide whether the container is
/// alive; it carries no other state.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

/// Serves the health probe until the process exits.
pub async fn serve_health(port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Health endpoint listening on port {port}");
    axum::serve(listener, health_router()).await?;
    Ok(())
}
