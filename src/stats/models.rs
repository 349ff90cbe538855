use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::EnumString;

use crate::records::{GameResult, ResultSet};

/// Column the leaderboard is ranked by, highest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LeaderboardMetric {
    #[default]
    Average,
    Total,
    Best,
    Games,
}

// Query strings go through the strum parser so names match case-insensitively.
impl TryFrom<String> for LeaderboardMetric {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player: String,
    pub games_played: u32,
    pub average_score: f64,
    pub total_score: u64,
    pub best_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: String,
    pub total_games: u32,
    pub average_score: f64,
    pub best_score: u32,
    pub worst_score: u32,
    pub total_score: u64,
    /// Population standard deviation of the player's scores.
    pub score_std_dev: f64,
    pub perfect_games: u32,
    pub trend: Trend,
    /// Recent five-game mean minus the previous five-game mean.
    pub trend_delta: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Flat,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub player: String,
    pub trend: Trend,
    pub games_played: usize,
    pub recent_average: Option<f64>,
    pub previous_average: Option<f64>,
    pub delta: Option<f64>,
}

/// One histogram bar. `[lower, upper)` except the last, which is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub label: String,
    pub lower: u32,
    pub upper: u32,
    pub upper_inclusive: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub player1: PlayerStats,
    pub player2: PlayerStats,
    /// Distinct dates on which both players have at least one game.
    pub shared_dates: usize,
    pub player1_games_on_shared_dates: usize,
    pub player2_games_on_shared_dates: usize,
    /// `player1.average_score - player2.average_score`
    pub average_score_diff: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerfectGames {
    pub overall: usize,
    /// Only players with at least one perfect game appear.
    pub per_player: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_games: usize,
    pub total_players: usize,
    pub average_score: f64,
    pub highest_score: u32,
    pub perfect_games: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimePeriod {
    #[default]
    Day,
    /// ISO weeks starting on Monday.
    Week,
    Month,
}

impl TryFrom<String> for TimePeriod {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub period_start: NaiveDate,
    pub average_score: f64,
    pub games_played: usize,
    pub best_score: u32,
}

/// Inclusive date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Derives a new result set holding only games inside the window. A
    /// window whose start is after its end selects nothing.
    pub fn apply(&self, results: &ResultSet) -> ResultSet {
        if self.is_unbounded() {
            return results.clone();
        }
        results.filter(|game: &GameResult| self.contains(game.date()))
    }
}
