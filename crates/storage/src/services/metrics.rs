use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Star;

/// Derived fields for a single score, computed against the zone's
/// current world record and star thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMetrics {
    pub percent_wr: Decimal,
    pub stars: i32,
}

/// The first score in a zone has no world record to measure against and
/// is treated as a provisional 100%.
pub fn compute_metrics(value: i64, world_record: Option<i64>, thresholds: &[Star]) -> ScoreMetrics {
    let percent_wr = match world_record {
        Some(wr) if wr > 0 => percent_of_wr(value, wr),
        _ => Decimal::new(10000, 2),
    };

    // Thresholds are exclusive lower bounds: a score sitting exactly on
    // one does not earn that star.
    let stars = thresholds.iter().filter(|star| value > star.value).count() as i32;

    ScoreMetrics { percent_wr, stars }
}

/// Percent of the world record, two decimals, half away from zero.
pub fn percent_of_wr(value: i64, wr_value: i64) -> Decimal {
    (Decimal::from(value) * Decimal::from(100) / Decimal::from(wr_value))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn thresholds(values: &[i64]) -> Vec<Star> {
        let zone_id = Uuid::new_v4();
        values
            .iter()
            .enumerate()
            .map(|(i, value)| Star {
                star_id: Uuid::new_v4(),
                zone_id,
                nb_stars: i as i32 + 1,
                value: *value,
            })
            .collect()
    }

    #[rstest]
    #[case(900, 2)]
    #[case(800, 1)] // exactly on a threshold: must exceed, not reach
    #[case(500, 0)]
    #[case(501, 1)]
    #[case(1200, 2)]
    #[case(1201, 3)]
    fn stars_use_exclusive_thresholds(#[case] value: i64, #[case] expected: i32) {
        let stars = thresholds(&[500, 800, 1200]);
        let metrics = compute_metrics(value, Some(2000), &stars);
        assert_eq!(metrics.stars, expected);
    }

    #[test]
    fn percent_is_provisional_without_world_record() {
        let metrics = compute_metrics(1234, None, &[]);
        assert_eq!(metrics.percent_wr, Decimal::new(10000, 2));
    }

    #[test]
    fn percent_ignores_non_positive_world_record() {
        let metrics = compute_metrics(1234, Some(0), &[]);
        assert_eq!(metrics.percent_wr, Decimal::new(10000, 2));
    }

    #[rstest]
    #[case(1000, 1000, "100.00")]
    #[case(500, 1000, "50.00")]
    #[case(1, 3, "33.33")]
    #[case(999, 1000, "99.90")]
    #[case(1, 800, "0.13")] // midpoint rounds away from zero
    fn percent_rounds_to_two_decimals(
        #[case] value: i64,
        #[case] wr: i64,
        #[case] expected: &str,
    ) {
        let expected: Decimal = expected.parse().unwrap();
        assert_eq!(percent_of_wr(value, wr), expected);
    }
}
