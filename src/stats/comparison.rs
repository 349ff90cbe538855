use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use super::{service::compute_player_stats, HeadToHead, PerfectGames, ScoreAnalyzer, StatsError};
use crate::records::GameResult;

impl ScoreAnalyzer<'_> {
    /// Raw side-by-side comparison of two players. No significance testing.
    pub fn head_to_head(&self, player1: &str, player2: &str) -> Result<HeadToHead, StatsError> {
        let (name1, games1) = self.games_of(player1)?;
        let (name2, games2) = self.games_of(player2)?;

        let shared: BTreeSet<NaiveDate> = dates(&games1)
            .intersection(&dates(&games2))
            .copied()
            .collect();
        let on_shared_dates = |games: &[&GameResult]| {
            games
                .iter()
                .filter(|game| shared.contains(&game.date()))
                .count()
        };

        let stats1 = compute_player_stats(&name1, &games1);
        let stats2 = compute_player_stats(&name2, &games2);

        Ok(HeadToHead {
            shared_dates: shared.len(),
            player1_games_on_shared_dates: on_shared_dates(&games1),
            player2_games_on_shared_dates: on_shared_dates(&games2),
            average_score_diff: stats1.average_score - stats2.average_score,
            player1: stats1,
            player2: stats2,
        })
    }

    pub fn perfect_games(&self) -> PerfectGames {
        let mut per_player: BTreeMap<String, usize> = BTreeMap::new();
        let mut overall = 0;
        for game in self.results().iter().filter(|game| game.is_perfect()) {
            overall += 1;
            *per_player.entry(game.player().to_string()).or_default() += 1;
        }
        PerfectGames {
            overall,
            per_player,
        }
    }

    pub fn perfect_games_for(&self, player: &str) -> Result<usize, StatsError> {
        let (_, games) = self.games_of(player)?;
        Ok(games.iter().filter(|game| game.is_perfect()).count())
    }
}

fn dates(games: &[&GameResult]) -> BTreeSet<NaiveDate> {
    games.iter().map(|game| game.date()).collect()
}
