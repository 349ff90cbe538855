// Library crate for the GeoGuessr score dashboard
// This file exposes the public API for the server binary and integration tests

pub mod config;
pub mod dashboard;
pub mod loader;
pub mod records;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{router, DashboardService, Snapshot};
pub use loader::{
    GoogleSheetSource, InMemorySheetSource, LoadCache, LoadError, LoadOutcome, Loader,
    ManualClock, SheetRequest, SheetSource, SheetTable, SystemClock,
};
pub use records::{GameResult, RejectedRow, ResultSet, Validator};
pub use shared::{AppError, AppState};
pub use stats::{ScoreAnalyzer, StatsError};
