//! Public read-only HTTP API

mod handlers;
mod responses;
mod routes;

pub use responses::*;
pub use routes::*;

use crate::config::ApiConfig;
use crate::core::DistributionLogSource;
use crate::stats::StatsService;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Start the API server
pub async fn start_server(
    state: ApiState,
    config: &ApiConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let mut app = create_router(state);
    if config.enable_cors {
        app = app.layer(ServiceBuilder::new().layer(CorsLayer::permissive()));
    }

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .merge(create_public_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check handler
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "gold-stats"
    }))
}

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub stats: Arc<StatsService>,
    pub logs: Option<Arc<dyn DistributionLogSource>>,
}

impl ApiState {
    pub fn new(stats: Arc<StatsService>) -> Self {
        Self { stats, logs: None }
    }

    pub fn with_logs(mut self, logs: Arc<dyn DistributionLogSource>) -> Self {
        self.logs = Some(logs);
        self
    }
}
