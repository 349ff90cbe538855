use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::errors::RowIssue;

/// Highest score a single game can award.
pub const MAX_SCORE: u32 = 25_000;

/// One validated game. Only [`super::Validator`] builds these, so every
/// instance downstream of the loader is known to be well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    player: String,
    date: NaiveDate,
    score: u32,
}

impl GameResult {
    pub(super) fn new(player: String, date: NaiveDate, score: u32) -> Self {
        Self {
            player,
            date,
            score,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_perfect(&self) -> bool {
        self.score == MAX_SCORE
    }
}

/// A sheet row after column mapping but before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based sheet row; the header occupies row 1.
    pub row_number: usize,
    pub player: String,
    pub date: String,
    pub score: String,
}

impl RawRow {
    pub fn new(
        row_number: usize,
        player: impl Into<String>,
        date: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            player: player.into(),
            date: date.into(),
            score: score.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.player.trim().is_empty() && self.date.trim().is_empty() && self.score.trim().is_empty()
    }
}

/// A row the validator refused, kept for user-facing diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub row: RawRow,
    pub issues: Vec<RowIssue>,
    pub reason: String,
}

impl RejectedRow {
    pub fn new(row: RawRow, issues: Vec<RowIssue>) -> Self {
        let reason = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self { row, issues, reason }
    }
}

/// Ordered collection of validated games, one entry per game played.
///
/// Never mutated in place: filtering produces a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    games: Vec<GameResult>,
}

impl ResultSet {
    pub fn new(games: Vec<GameResult>) -> Self {
        Self { games }
    }

    pub fn games(&self) -> &[GameResult] {
        &self.games
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameResult> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn players(&self) -> BTreeSet<&str> {
        self.games.iter().map(GameResult::player).collect()
    }

    /// Games for one player, in sheet order.
    pub fn games_for(&self, player: &str) -> Vec<&GameResult> {
        self.games
            .iter()
            .filter(|game| game.player() == player)
            .collect()
    }

    /// Games grouped by player name, each group in sheet order.
    pub fn by_player(&self) -> BTreeMap<&str, Vec<&GameResult>> {
        let mut grouped: BTreeMap<&str, Vec<&GameResult>> = BTreeMap::new();
        for game in &self.games {
            grouped.entry(game.player()).or_default().push(game);
        }
        grouped
    }

    pub fn filter<P>(&self, mut predicate: P) -> ResultSet
    where
        P: FnMut(&GameResult) -> bool,
    {
        self.games
            .iter()
            .filter(|game| predicate(game))
            .cloned()
            .collect()
    }
}

impl FromIterator<GameResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = GameResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a GameResult;
    type IntoIter = std::slice::Iter<'a, GameResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}
