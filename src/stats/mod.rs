//! Score analytics: rankings, per-player statistics, trends, comparisons and
//! time-based views over a [`crate::records::ResultSet`].

pub mod comparison;
pub mod distribution;
pub mod service;
pub mod timeline;
pub mod trend;

mod errors;
pub mod models;

pub use distribution::BUCKET_WIDTH;
pub use errors::StatsError;
pub use models::*;
pub use service::ScoreAnalyzer;
pub use trend::TREND_WINDOW;
