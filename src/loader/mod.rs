pub use cache::{CachedLoad, Clock, LoadCache, ManualClock, SystemClock};
pub use errors::LoadError;
pub use google::GoogleSheetSource;
pub use schema::ColumnMap;
pub use service::{LoadOutcome, Loader};
pub use source::{InMemorySheetSource, SheetRequest, SheetSource, SheetTable};

pub mod cache;
mod errors;
mod google;
pub mod schema;
mod service;
pub mod source;
