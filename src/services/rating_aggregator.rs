// src/services/rating_aggregator.rs
// DOCUMENTATION: Stateless rating analytics
// PURPOSE: Recompute averages, star distribution and response rate from
// committed review rows on every request

use crate::models::RatingSample;
use serde::Serialize;

/// Counts of reviews per star value; buckets always sum to the total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: i64,
    #[serde(rename = "2")]
    pub two: i64,
    #[serde(rename = "3")]
    pub three: i64,
    #[serde(rename = "4")]
    pub four: i64,
    #[serde(rename = "5")]
    pub five: i64,
}

impl RatingDistribution {
    pub fn total(&self) -> i64 {
        self.one + self.two + self.three + self.four + self.five
    }
}

/// Aggregated rating analytics for a property or portfolio
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub total_reviews: i64,
    pub average_rating: f64,
    pub rating_distribution: RatingDistribution,
    pub responses_given: i64,
    pub response_rate: i64,
}

/// Pure aggregation over fetched review rows.
/// DOCUMENTATION: There are no cached or running counters anywhere in the
/// schema; every figure is derived from the rows a request fetched, so
/// concurrent writers cannot make the numbers drift.
pub struct RatingAggregator;

impl RatingAggregator {
    /// Compute the full summary for a set of samples
    pub fn summarize(samples: &[RatingSample]) -> RatingSummary {
        let total = samples.len() as i64;
        let responses_given = Self::responses_given(samples);

        RatingSummary {
            total_reviews: total,
            average_rating: Self::average_rating(samples),
            rating_distribution: Self::distribution(samples),
            responses_given,
            response_rate: Self::response_rate(samples),
        }
    }

    /// Mean overall rating, rounded to two decimals; 0 (never NaN) when empty
    pub fn average_rating(samples: &[RatingSample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: i64 = samples.iter().map(|s| s.rating as i64).sum();
        let mean = sum as f64 / samples.len() as f64;
        (mean * 100.0).round() / 100.0
    }

    /// Count of reviews per star value 1..5
    pub fn distribution(samples: &[RatingSample]) -> RatingDistribution {
        let mut dist = RatingDistribution::default();
        for sample in samples {
            match sample.rating {
                1 => dist.one += 1,
                2 => dist.two += 1,
                3 => dist.three += 1,
                4 => dist.four += 1,
                5 => dist.five += 1,
                other => log::warn!("Ignoring out-of-range rating {} in aggregation", other),
            }
        }
        dist
    }

    /// Count of reviews that have a host response
    pub fn responses_given(samples: &[RatingSample]) -> i64 {
        samples.iter().filter(|s| s.has_response).count() as i64
    }

    /// Percentage of reviews with a host response, rounded; 0 when empty
    pub fn response_rate(samples: &[RatingSample]) -> i64 {
        if samples.is_empty() {
            return 0;
        }
        let given = Self::responses_given(samples) as f64;
        (given / samples.len() as f64 * 100.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rating: i32, has_response: bool) -> RatingSample {
        RatingSample {
            rating,
            has_response,
        }
    }

    #[test]
    fn test_empty_set_yields_zeroes_not_nan() {
        let summary = RatingAggregator::summarize(&[]);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.response_rate, 0);
        assert_eq!(summary.responses_given, 0);
        assert_eq!(summary.rating_distribution.total(), 0);
    }

    #[test]
    fn test_average_and_distribution() {
        // Ratings [5, 5, 4, 3] -> average 4.25, {5:2, 4:1, 3:1, 2:0, 1:0}
        let samples = vec![
            sample(5, true),
            sample(5, false),
            sample(4, false),
            sample(3, false),
        ];

        let summary = RatingAggregator::summarize(&samples);
        assert_eq!(summary.total_reviews, 4);
        assert_eq!(summary.average_rating, 4.25);
        assert_eq!(summary.rating_distribution.five, 2);
        assert_eq!(summary.rating_distribution.four, 1);
        assert_eq!(summary.rating_distribution.three, 1);
        assert_eq!(summary.rating_distribution.two, 0);
        assert_eq!(summary.rating_distribution.one, 0);
    }

    #[test]
    fn test_distribution_buckets_sum_to_total() {
        let samples: Vec<RatingSample> = (0..37)
            .map(|i| sample((i % 5) + 1, i % 3 == 0))
            .collect();

        let dist = RatingAggregator::distribution(&samples);
        assert_eq!(dist.total(), samples.len() as i64);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        // [5, 4, 4] -> 4.333... -> 4.33
        let samples = vec![sample(5, false), sample(4, false), sample(4, false)];
        assert_eq!(RatingAggregator::average_rating(&samples), 4.33);
    }

    #[test]
    fn test_response_rate_rounding() {
        // 1 of 3 -> 33%, 2 of 3 -> 67%
        let one_of_three = vec![sample(5, true), sample(4, false), sample(3, false)];
        assert_eq!(RatingAggregator::response_rate(&one_of_three), 33);

        let two_of_three = vec![sample(5, true), sample(4, true), sample(3, false)];
        assert_eq!(RatingAggregator::response_rate(&two_of_three), 67);

        let all = vec![sample(5, true)];
        assert_eq!(RatingAggregator::response_rate(&all), 100);
    }
}
