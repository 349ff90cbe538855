use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

use super::{service::mean, ScoreAnalyzer, StatsError, Summary, TimePeriod, TimeSeriesPoint};
use crate::records::GameResult;

impl TimePeriod {
    /// First day of the period containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            TimePeriod::Day => date,
            TimePeriod::Week => date
                .checked_sub_days(Days::new(date.weekday().num_days_from_monday().into()))
                .unwrap_or(date),
            TimePeriod::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

impl ScoreAnalyzer<'_> {
    pub fn summary(&self) -> Summary {
        let results = self.results();
        let total: u64 = results.iter().map(|g| u64::from(g.score())).sum();

        Summary {
            total_games: results.len(),
            total_players: results.players().len(),
            average_score: mean(total, results.len()),
            highest_score: results.iter().map(GameResult::score).max().unwrap_or_default(),
            perfect_games: results.iter().filter(|g| g.is_perfect()).count(),
            first_date: results.iter().map(GameResult::date).min(),
            last_date: results.iter().map(GameResult::date).max(),
        }
    }

    /// The `limit` most recent games, newest first.
    pub fn recent_games(&self, limit: usize) -> Vec<GameResult> {
        newest_first(self.results().iter())
            .into_iter()
            .take(limit)
            .collect()
    }

    /// Every game of one player, newest first.
    pub fn player_history(&self, player: &str) -> Result<Vec<GameResult>, StatsError> {
        let (_, games) = self.games_of(player)?;
        Ok(newest_first(games))
    }

    /// Scores grouped by calendar period, oldest period first. Periods
    /// without games are left out.
    pub fn time_series(
        &self,
        player: Option<&str>,
        period: TimePeriod,
    ) -> Result<Vec<TimeSeriesPoint>, StatsError> {
        let games = match player {
            Some(player) => self.games_of(player)?.1,
            None => self.results().iter().collect(),
        };

        // period start -> (games, total, best)
        let mut periods: BTreeMap<NaiveDate, (usize, u64, u32)> = BTreeMap::new();
        for game in games {
            let entry = periods.entry(period.start_of(game.date())).or_default();
            entry.0 += 1;
            entry.1 += u64::from(game.score());
            entry.2 = entry.2.max(game.score());
        }

        Ok(periods
            .into_iter()
            .map(|(period_start, (count, total, best))| TimeSeriesPoint {
                period_start,
                average_score: mean(total, count),
                games_played: count,
                best_score: best,
            })
            .collect())
    }
}

// Games on the same date keep sheet order, so later rows count as newer.
fn newest_first<'a>(games: impl IntoIterator<Item = &'a GameResult>) -> Vec<GameResult> {
    let mut indexed: Vec<(usize, &GameResult)> = games.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| b.date().cmp(&a.date()).then(ib.cmp(ia)));
    indexed.into_iter().map(|(_, game)| game.clone()).collect()
}
