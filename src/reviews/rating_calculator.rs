use crate::reviews::{RatingBucket, ReviewStats};

/// Aggregates per-star counts into review statistics
pub struct RatingCalculator;

impl RatingCalculator {
    /// Build stats from (rating, count) pairs in any order
    ///
    /// The distribution always has five entries, 5 stars first, with zero
    /// counts filled in.
    pub fn summarize(counts: &[(i16, i64)]) -> ReviewStats {
        let total_reviews: i64 = counts.iter().map(|(_, count)| count).sum();
        let weighted: i64 = counts
            .iter()
            .map(|(rating, count)| i64::from(*rating) * count)
            .sum();

        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            round_2dp(weighted as f64 / total_reviews as f64)
        };

        let distribution = (1..=5)
            .rev()
            .map(|rating: i16| RatingBucket {
                rating,
                count: counts
                    .iter()
                    .filter(|(r, _)| *r == rating)
                    .map(|(_, c)| c)
                    .sum(),
            })
            .collect();

        ReviewStats {
            average_rating,
            total_reviews,
            distribution,
        }
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
