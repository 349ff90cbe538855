use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Transport, permission or decoding failure reaching the sheet.
    #[error("sheet source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("sheet is missing required column(s): {}", .missing.join(", "))]
    SchemaMissing { missing: Vec<String> },
}
