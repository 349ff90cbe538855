use super::{ScoreAnalyzer, ScoreBucket};
use crate::records::MAX_SCORE;

pub const BUCKET_WIDTH: u32 = 5_000;
const BUCKET_COUNT: usize = (MAX_SCORE / BUCKET_WIDTH) as usize;

impl ScoreAnalyzer<'_> {
    /// Histogram of all scores in fixed 5000-point buckets. Every bucket is
    /// returned, empty ones included, and the top bucket also holds 25000.
    pub fn score_distribution(&self) -> Vec<ScoreBucket> {
        let mut counts = [0usize; BUCKET_COUNT];
        for game in self.results() {
            let index = (game.score() / BUCKET_WIDTH) as usize;
            counts[index.min(BUCKET_COUNT - 1)] += 1;
        }

        counts
            .iter()
            .enumerate()
            .map(|(index, &count)| {
                let lower = index as u32 * BUCKET_WIDTH;
                let upper = lower + BUCKET_WIDTH;
                ScoreBucket {
                    label: format!("{}-{}", thousands(lower), thousands(upper)),
                    lower,
                    upper,
                    upper_inclusive: index == BUCKET_COUNT - 1,
                    count,
                }
            })
            .collect()
    }
}

fn thousands(value: u32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{}K", value / 1_000)
    }
}
