use super::LoadError;
use crate::records::RawRow;

pub const PLAYER_COLUMN: &str = "player";
pub const DATE_COLUMN: &str = "date";
pub const SCORE_COLUMN: &str = "score";

/// Positions of the required columns within a sheet's header row.
///
/// Headers match trimmed and case-insensitively; the first matching header
/// wins when a name repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    player: usize,
    date: usize,
    score: usize,
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.as_ref().trim().eq_ignore_ascii_case(name))
        };

        match (
            position(PLAYER_COLUMN),
            position(DATE_COLUMN),
            position(SCORE_COLUMN),
        ) {
            (Some(player), Some(date), Some(score)) => Ok(Self {
                player,
                date,
                score,
            }),
            (player, date, score) => {
                let missing = [
                    (player, PLAYER_COLUMN),
                    (date, DATE_COLUMN),
                    (score, SCORE_COLUMN),
                ]
                .into_iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name.to_string())
                .collect();
                Err(LoadError::SchemaMissing { missing })
            }
        }
    }

    /// Pulls the mapped cells out of one data row. Cells past the end of a
    /// short row read as empty.
    pub fn extract(&self, row_number: usize, cells: &[String]) -> RawRow {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        RawRow::new(
            row_number,
            cell(self.player),
            cell(self.date),
            cell(self.score),
        )
    }
}
