use std::cmp::Ordering;

use super::{service::mean, ScoreAnalyzer, StatsError, Trend, TrendReport};
use crate::records::GameResult;

/// Games in each of the two windows being compared.
pub const TREND_WINDOW: usize = 5;

pub(super) struct TrendAssessment {
    pub trend: Trend,
    pub recent_average: Option<f64>,
    pub previous_average: Option<f64>,
}

impl TrendAssessment {
    fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            recent_average: None,
            previous_average: None,
        }
    }

    pub fn delta(&self) -> Option<f64> {
        Some(self.recent_average? - self.previous_average?)
    }
}

/// Compares the mean of the latest [`TREND_WINDOW`] games with the mean of
/// the window before it. Games on the same date keep their sheet order.
pub(super) fn assess(games: &[&GameResult]) -> TrendAssessment {
    if games.len() < TREND_WINDOW * 2 {
        return TrendAssessment::insufficient();
    }

    let mut chronological = games.to_vec();
    chronological.sort_by_key(|game| game.date());

    let split = chronological.len() - TREND_WINDOW;
    let recent = window_total(&chronological[split..]);
    let previous = window_total(&chronological[split - TREND_WINDOW..split]);

    // Both windows hold the same number of games, so comparing the integer
    // totals decides the trend without float rounding.
    let trend = match recent.cmp(&previous) {
        Ordering::Greater => Trend::Improving,
        Ordering::Less => Trend::Declining,
        Ordering::Equal => Trend::Flat,
    };

    TrendAssessment {
        trend,
        recent_average: Some(mean(recent, TREND_WINDOW)),
        previous_average: Some(mean(previous, TREND_WINDOW)),
    }
}

fn window_total(games: &[&GameResult]) -> u64 {
    games.iter().map(|g| u64::from(g.score())).sum()
}

impl ScoreAnalyzer<'_> {
    pub fn trend(&self, player: &str) -> Result<TrendReport, StatsError> {
        let (name, games) = self.games_of(player)?;
        let assessment = assess(&games);

        Ok(TrendReport {
            player: name,
            trend: assessment.trend,
            games_played: games.len(),
            recent_average: assessment.recent_average,
            previous_average: assessment.previous_average,
            delta: assessment.delta(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{game, result_set};
    use crate::records::ResultSet;
    use rstest::rstest;

    /// One game per day in January, scores in play order.
    fn history(player: &str, scores: &[u32]) -> Vec<GameResult> {
        scores
            .iter()
            .enumerate()
            .map(|(day, score)| game(player, &format!("2024-01-{:02}", day + 1), *score))
            .collect()
    }

    fn report(results: &ResultSet) -> TrendReport {
        ScoreAnalyzer::new(results).trend("alice").unwrap()
    }

    #[test]
    fn ten_games_with_better_recent_window_is_improving() {
        let mut scores = vec![15_000; 5];
        scores.extend([20_000; 5]);
        let results = result_set(history("alice", &scores));

        let report = report(&results);

        assert_eq!(report.trend, Trend::Improving);
        assert_eq!(report.recent_average, Some(20_000.0));
        assert_eq!(report.previous_average, Some(15_000.0));
        assert_eq!(report.delta, Some(5_000.0));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(9)]
    fn fewer_than_ten_games_is_insufficient(#[case] count: usize) {
        let mut games = history("alice", &vec![20_000; count]);
        games.push(game("bob", "2024-01-01", 0));
        let results = result_set(games);

        let analyzer = ScoreAnalyzer::new(&results);
        match analyzer.trend("alice") {
            Ok(report) => {
                assert_eq!(report.trend, Trend::InsufficientData);
                assert_eq!(report.delta, None);
                assert_eq!(report.games_played, count);
            }
            Err(StatsError::PlayerNotFound(_)) => assert_eq!(count, 0),
        }
    }

    #[test]
    fn worse_recent_window_is_declining() {
        let mut scores = vec![24_000; 5];
        scores.extend([12_000; 5]);
        let results = result_set(history("alice", &scores));

        assert_eq!(report(&results).trend, Trend::Declining);
    }

    #[test]
    fn equal_windows_are_flat() {
        let scores = [
            10_000, 20_000, 10_000, 20_000, 15_000, 15_000, 15_000, 15_000, 15_000, 15_000,
        ];
        let results = result_set(history("alice", &scores));

        let report = report(&results);
        assert_eq!(report.trend, Trend::Flat);
        assert_eq!(report.delta, Some(0.0));
    }

    #[test]
    fn only_the_latest_ten_games_count() {
        // Two very old games would drag the previous window down if they
        // were included.
        let mut scores = vec![0, 0];
        scores.extend([18_000; 5]);
        scores.extend([18_000; 5]);
        let results = result_set(history("alice", &scores));

        assert_eq!(report(&results).trend, Trend::Flat);
    }

    #[test]
    fn games_are_ordered_by_date_not_sheet_position() {
        // Sheet lists the strong games first but they were played last.
        let mut games: Vec<GameResult> = (0..5)
            .map(|i| game("alice", &format!("2024-03-{:02}", i + 10), 22_000))
            .collect();
        games.extend((0..5).map(|i| game("alice", &format!("2024-03-{:02}", i + 1), 11_000)));
        let results = result_set(games);

        assert_eq!(report(&results).trend, Trend::Improving);
    }

    #[test]
    fn player_stats_carry_the_trend() {
        let mut scores = vec![15_000; 5];
        scores.extend([20_000; 5]);
        let results = result_set(history("alice", &scores));

        let stats = ScoreAnalyzer::new(&results).player_stats("alice").unwrap();

        assert_eq!(stats.trend, Trend::Improving);
        assert_eq!(stats.trend_delta, Some(5_000.0));
    }
}
