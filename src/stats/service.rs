use std::cmp::Ordering;

use super::{trend, LeaderboardMetric, LeaderboardRow, PlayerStats, StatsError};
use crate::records::{normalize_player, GameResult, ResultSet};

/// Read-only analytics over one [`ResultSet`].
///
/// Every query works on exactly the set it was built with; date filtering
/// happens before construction (see [`super::DateRange::apply`]). Queries
/// naming a player fail with [`StatsError::PlayerNotFound`] when that player
/// has no games here, while aggregate queries over an empty set return
/// empty or zeroed results.
#[derive(Debug, Clone, Copy)]
pub struct ScoreAnalyzer<'a> {
    results: &'a ResultSet,
}

impl<'a> ScoreAnalyzer<'a> {
    pub fn new(results: &'a ResultSet) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &'a ResultSet {
        self.results
    }

    /// Statistics for one player. The name is normalized the same way sheet
    /// rows are, so `"  alice "` finds `"Alice"`.
    pub fn player_stats(&self, player: &str) -> Result<PlayerStats, StatsError> {
        let (name, games) = self.games_of(player)?;
        Ok(compute_player_stats(&name, &games))
    }

    /// Statistics for every player, best average first.
    pub fn all_player_stats(&self) -> Vec<PlayerStats> {
        let mut stats = self.compute_all();
        sort_by_metric(&mut stats, LeaderboardMetric::Average);
        stats
    }

    /// Ranks players by `metric`, highest first. Ties go to the player whose
    /// name sorts first.
    pub fn leaderboard(
        &self,
        metric: LeaderboardMetric,
        limit: Option<usize>,
    ) -> Vec<LeaderboardRow> {
        let mut stats = self.compute_all();
        sort_by_metric(&mut stats, metric);

        stats
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(index, s)| LeaderboardRow {
                rank: index + 1,
                player: s.player,
                games_played: s.total_games,
                average_score: s.average_score,
                total_score: s.total_score,
                best_score: s.best_score,
            })
            .collect()
    }

    pub(super) fn games_of(
        &self,
        player: &str,
    ) -> Result<(String, Vec<&'a GameResult>), StatsError> {
        let not_found = || StatsError::PlayerNotFound(player.trim().to_string());
        let name = normalize_player(player).map_err(|_| not_found())?;
        let games = self.results.games_for(&name);
        if games.is_empty() {
            return Err(not_found());
        }
        Ok((name, games))
    }

    fn compute_all(&self) -> Vec<PlayerStats> {
        self.results
            .by_player()
            .into_iter()
            .map(|(player, games)| compute_player_stats(player, &games))
            .collect()
    }
}

impl LeaderboardMetric {
    /// Ascending comparison of two players on this metric.
    pub fn compare(self, a: &PlayerStats, b: &PlayerStats) -> Ordering {
        match self {
            LeaderboardMetric::Average => a.average_score.total_cmp(&b.average_score),
            LeaderboardMetric::Total => a.total_score.cmp(&b.total_score),
            LeaderboardMetric::Best => a.best_score.cmp(&b.best_score),
            LeaderboardMetric::Games => a.total_games.cmp(&b.total_games),
        }
    }
}

fn sort_by_metric(stats: &mut [PlayerStats], metric: LeaderboardMetric) {
    stats.sort_by(|a, b| metric.compare(b, a).then_with(|| a.player.cmp(&b.player)));
}

pub(super) fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

pub(super) fn compute_player_stats(player: &str, games: &[&GameResult]) -> PlayerStats {
    let total_score: u64 = games.iter().map(|g| u64::from(g.score())).sum();
    let average_score = mean(total_score, games.len());

    let variance = if games.is_empty() {
        0.0
    } else {
        games
            .iter()
            .map(|g| {
                let deviation = f64::from(g.score()) - average_score;
                deviation * deviation
            })
            .sum::<f64>()
            / games.len() as f64
    };

    let assessment = trend::assess(games);

    PlayerStats {
        player: player.to_string(),
        total_games: games.len() as u32,
        average_score,
        best_score: games.iter().map(|g| g.score()).max().unwrap_or_default(),
        worst_score: games.iter().map(|g| g.score()).min().unwrap_or_default(),
        total_score,
        score_std_dev: variance.sqrt(),
        perfect_games: games.iter().filter(|g| g.is_perfect()).count() as u32,
        trend: assessment.trend,
        trend_delta: assessment.delta(),
    }
}
