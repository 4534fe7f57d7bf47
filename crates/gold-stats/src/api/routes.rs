//! API route definitions

use super::{handlers::*, ApiState};
use axum::{routing::get, Router};

/// Routes consumed by the public site
pub fn create_public_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/public/stats", get(get_stats))
        .route("/api/public/config", get(get_public_config))
        .route("/api/public/distribution-logs", get(list_distribution_logs))
        .route("/api/public/distributions", get(list_distributions))
        .route("/api/public/distributions/:id", get(get_distribution))
}
