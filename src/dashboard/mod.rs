pub mod handlers;
pub mod service;
pub mod types;

pub use handlers::router;
pub use service::{DashboardService, Snapshot};
pub use types::{ApiResponse, RefreshResponse};
