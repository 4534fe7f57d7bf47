//! API request handlers

use super::{responses::*, ApiState};
use crate::core::StatsError;
use crate::stats::StatsSnapshot;
use crate::store::{DistributionLogEntry, DistributionRecord};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

/// Default page size for distribution listings
pub const DEFAULT_DISTRIBUTION_LIMIT: usize = 50;

/// Entries served by the distribution log endpoint
pub const DISTRIBUTION_LOG_LIMIT: usize = 50;

/// Query parameters for distribution listings
#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    /// Requested limit; anything missing, unparsable or zero means the default
    pub fn resolve(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_DISTRIBUTION_LIMIT)
    }
}

/// Aggregated protocol stats
pub async fn get_stats(State(state): State<ApiState>) -> Result<Json<StatsSnapshot>, ApiError> {
    let snapshot = state.stats.get_stats().await.map_err(|e| {
        tracing::error!("Failed to fetch stats: {}", e);
        ApiError::internal("Failed to fetch stats")
    })?;

    Ok(Json(StatsSnapshot::clone(&snapshot)))
}

/// Tracked contract address
pub async fn get_public_config(State(state): State<ApiState>) -> Json<PublicConfigResponse> {
    Json(PublicConfigResponse {
        ca: state.stats.token_mint().map(str::to_string),
    })
}

/// Latest hand-curated distribution log entries
pub async fn list_distribution_logs(
    State(state): State<ApiState>,
) -> Result<Json<Vec<DistributionLogEntry>>, ApiError> {
    let Some(logs) = &state.logs else {
        return Ok(Json(Vec::new()));
    };

    let entries = logs.recent_logs(DISTRIBUTION_LOG_LIMIT).await.map_err(|e| {
        tracing::error!("Failed to fetch distribution logs: {}", e);
        ApiError::internal("Failed to fetch distribution logs")
    })?;

    Ok(Json(entries))
}

/// Recent completed or pending distributions
pub async fn list_distributions(
    State(state): State<ApiState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<DistributionRecord>>, ApiError> {
    let Some(store) = state.stats.store() else {
        return Ok(Json(Vec::new()));
    };

    let distributions = store
        .recent_distributions(query.resolve())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch distributions: {}", e);
            ApiError::internal("Failed to fetch distributions")
        })?;

    Ok(Json(
        distributions
            .into_iter()
            .filter(DistributionRecord::is_public)
            .collect(),
    ))
}

/// One distribution with its holder snapshots
pub async fn get_distribution(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DistributionResponse>, ApiError> {
    const NOT_FOUND: &str = "Distribution not found";

    let (Some(store), Ok(id)) = (state.stats.store(), Uuid::parse_str(&id)) else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    let lookup_failed = |e: StatsError| {
        tracing::error!("Failed to fetch distribution {}: {}", id, e);
        ApiError::internal("Failed to fetch distribution")
    };

    let distribution = store
        .distribution(&id)
        .await
        .map_err(lookup_failed)?
        .ok_or(ApiError::not_found(NOT_FOUND))?;
    let holders = store.holder_snapshots(&id).await.map_err(lookup_failed)?;

    Ok(Json(DistributionResponse {
        distribution,
        holders,
    }))
}
