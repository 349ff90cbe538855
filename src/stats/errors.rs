use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The named player has no games in the result set being analysed.
    #[error("player not found: {0}")]
    PlayerNotFound(String),
}
