//! API response types

use crate::store::{DistributionRecord, HolderSnapshot};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Response for `/api/public/config`
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicConfigResponse {
    pub ca: Option<String>,
}

/// Response for a single distribution
#[derive(Debug, Serialize, Deserialize)]
pub struct DistributionResponse {
    pub distribution: DistributionRecord,
    pub holders: Vec<HolderSnapshot>,
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status plus `{"error": ...}` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message.to_string(),
            }),
        )
            .into_response()
    }
}
