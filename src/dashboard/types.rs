use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::Snapshot;
use crate::stats::{LeaderboardMetric, TimePeriod};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Envelope for every analytics response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Present when the data comes from an older load after a failed reload.
    pub stale: Option<String>,
    pub rejected_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, snapshot: &Snapshot) -> Self {
        Self {
            data,
            stale: snapshot.stale.clone(),
            rejected_rows: snapshot.outcome.rejected.len(),
            loaded_at: snapshot.loaded_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub metric: LeaderboardMetric,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub player1: String,
    pub player2: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeSeriesQuery {
    pub player: Option<String>,
    #[serde(default)]
    pub period: TimePeriod,
}

/// Result of a manual refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub valid_rows: usize,
    pub rejected_rows: usize,
    pub loaded_at: DateTime<Utc>,
}
