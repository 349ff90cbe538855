use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{schema::ColumnMap, LoadError, SheetRequest, SheetSource};
use crate::records::{RejectedRow, ResultSet, Validator};

/// The product of one successful load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadOutcome {
    pub results: ResultSet,
    pub rejected: Vec<RejectedRow>,
    /// Data rows read from the sheet, blank rows included.
    pub raw_row_count: usize,
}

/// Fetches a sheet and validates its rows into a [`ResultSet`].
pub struct Loader {
    source: Arc<dyn SheetSource>,
    validator: Validator,
}

impl Loader {
    pub fn new(source: Arc<dyn SheetSource>, validator: Validator) -> Self {
        Self { source, validator }
    }

    /// Fails only when the sheet cannot be read or lacks a required column.
    /// Invalid rows are collected in [`LoadOutcome::rejected`] and do not
    /// affect the rest of the load.
    #[instrument(skip(self), fields(source = %request.source, worksheet = %request.worksheet))]
    pub async fn load(&self, request: &SheetRequest) -> Result<LoadOutcome, LoadError> {
        let table = self.source.fetch(request).await?;
        let columns = ColumnMap::resolve(table.headers())?;

        let mut games = Vec::with_capacity(table.rows().len());
        let mut rejected = Vec::new();

        for (index, cells) in table.rows().iter().enumerate() {
            // Row 1 is the header.
            let row = columns.extract(index + 2, cells);
            if row.is_blank() {
                continue;
            }

            match self.validator.validate(row) {
                Ok(game) => games.push(game),
                Err(rejection) => {
                    warn!(
                        row = rejection.row.row_number,
                        reason = %rejection.reason,
                        "Row validation failed"
                    );
                    rejected.push(rejection);
                }
            }
        }

        info!(
            valid = games.len(),
            rejected = rejected.len(),
            "Loaded sheet"
        );

        Ok(LoadOutcome {
            results: ResultSet::new(games),
            rejected,
            raw_row_count: table.rows().len(),
        })
    }
}
