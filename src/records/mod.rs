pub use errors::RowIssue;
pub use models::{GameResult, RawRow, RejectedRow, ResultSet, MAX_SCORE};
pub use validator::{normalize_player, parse_score, DateFormat, DatePolicy, Validator};

mod errors;
pub mod models;
pub mod validator;
