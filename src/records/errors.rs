use serde::Serialize;
use thiserror::Error;

use super::models::MAX_SCORE;

/// A single problem found while validating one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RowIssue {
    #[error("player name is empty")]
    EmptyPlayer,

    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),

    #[error("score is not a number: {0:?}")]
    ScoreNotNumeric(String),

    #[error("score is not a whole number: {0:?}")]
    ScoreNotWhole(String),

    #[error("score out of range (0-{max}): {0:?}", max = MAX_SCORE)]
    ScoreOutOfRange(String),
}
