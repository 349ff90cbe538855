use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::dashboard::DashboardService;
use crate::loader::LoadError;
use crate::stats::StatsError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(dashboard: Arc<DashboardService>) -> Self {
        Self { dashboard }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Load(LoadError::SourceUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Load(LoadError::SchemaMissing { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Stats(StatsError::PlayerNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
