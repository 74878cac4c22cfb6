use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// One row of a degressive fee schedule. `upper_bound` is the largest work
/// amount the tier applies to, inclusive; `None` marks the unbounded tail.
/// `rate` is a fraction (0.12 = 12% of the work amount).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    pub upper_bound: Option<f64>,
    pub rate: f64,
}

impl FeeTier {
    pub const fn bounded(upper_bound: f64, rate: f64) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub const fn unbounded(rate: f64) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// Malformed fee-tier table, detected once when the schedule is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("fee schedule has no tiers")]
    Empty,
    #[error("tier {index}: upper bound {bound} does not exceed the previous tier's bound")]
    BoundsNotAscending { index: usize, bound: f64 },
    #[error("tier {index}: only the final tier may be unbounded")]
    UnboundedBeforeTail { index: usize },
    #[error("final tier must be unbounded so every work amount resolves")]
    MissingUnboundedTail,
    #[error("tier {index}: rate {rate} must be a fraction in [0, 1]")]
    RateOutOfRange { index: usize, rate: f64 },
    #[error("tier {index}: rate {rate} exceeds the previous tier's; the schedule must be degressive")]
    RateIncreasing { index: usize, rate: f64 },
}

/// An ordered, validated degressive fee schedule. Validation happens once
/// here; `resolve_rate` assumes a well-formed table and never re-checks it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    pub fn new(tiers: Vec<FeeTier>) -> Result<Self, ScheduleError> {
        if tiers.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let mut previous_bound: Option<f64> = None;
        let mut previous_rate: Option<f64> = None;
        let last_index = tiers.len() - 1;

        for (index, tier) in tiers.iter().enumerate() {
            if !(0.0..=1.0).contains(&tier.rate) {
                return Err(ScheduleError::RateOutOfRange {
                    index,
                    rate: tier.rate,
                });
            }

            match tier.upper_bound {
                Some(bound) => {
                    if index == last_index {
                        return Err(ScheduleError::MissingUnboundedTail);
                    }
                    if bound <= 0.0 || previous_bound.is_some_and(|prev| bound <= prev) {
                        return Err(ScheduleError::BoundsNotAscending { index, bound });
                    }
                    previous_bound = Some(bound);
                }
                None => {
                    if index != last_index {
                        return Err(ScheduleError::UnboundedBeforeTail { index });
                    }
                }
            }

            if previous_rate.is_some_and(|prev| tier.rate > prev) {
                return Err(ScheduleError::RateIncreasing {
                    index,
                    rate: tier.rate,
                });
            }
            previous_rate = Some(tier.rate);
        }

        Ok(Self { tiers })
    }

    /// The published schedule: 12% up to 60k, stepping down to 5% above 1M.
    pub fn standard() -> Self {
        // Known-good table, so the validating constructor is bypassed.
        Self {
            tiers: vec![
                FeeTier::bounded(60_000.0, 0.12),
                FeeTier::bounded(150_000.0, 0.10),
                FeeTier::bounded(300_000.0, 0.08),
                FeeTier::bounded(600_000.0, 0.07),
                FeeTier::bounded(1_000_000.0, 0.06),
                FeeTier::unbounded(0.05),
            ],
        }
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Returns the fee rate for a work amount: the first tier whose upper
    /// bound is greater than or equal to the amount. Bounds are inclusive,
    /// so a work amount sitting exactly on a bound gets the cheaper tier.
    pub fn resolve_rate(&self, work_amount: f64) -> Result<f64, InputError> {
        if work_amount < 0.0 || work_amount.is_nan() {
            return Err(InputError::Negative {
                field: "work amount",
                value: work_amount,
            });
        }

        let tier = self
            .tiers
            .iter()
            .find(|tier| tier.upper_bound.map_or(true, |bound| work_amount <= bound))
            .unwrap_or_else(|| unreachable!("validated schedule ends with an unbounded tier"));

        Ok(tier.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_schedule_passes_its_own_validation() {
        let tiers = FeeSchedule::standard().tiers().to_vec();
        FeeSchedule::new(tiers).expect("published schedule is well-formed");
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(FeeSchedule::new(Vec::new()), Err(ScheduleError::Empty));
    }

    #[test]
    fn rejects_non_ascending_bounds() {
        let err = FeeSchedule::new(vec![
            FeeTier::bounded(100_000.0, 0.10),
            FeeTier::bounded(60_000.0, 0.08),
            FeeTier::unbounded(0.05),
        ])
        .expect_err("descending bounds are malformed");
        assert_eq!(
            err,
            ScheduleError::BoundsNotAscending {
                index: 1,
                bound: 60_000.0
            }
        );
    }

    #[test]
    fn rejects_bounded_tail() {
        let err = FeeSchedule::new(vec![
            FeeTier::bounded(60_000.0, 0.12),
            FeeTier::bounded(150_000.0, 0.10),
        ])
        .expect_err("a bounded final tier leaves large amounts unresolvable");
        assert_eq!(err, ScheduleError::MissingUnboundedTail);
    }

    #[test]
    fn rejects_unbounded_tier_in_the_middle() {
        let err = FeeSchedule::new(vec![FeeTier::unbounded(0.10), FeeTier::unbounded(0.05)])
            .expect_err("unbounded tier before the tail");
        assert_eq!(err, ScheduleError::UnboundedBeforeTail { index: 0 });
    }

    #[test]
    fn rejects_increasing_rates() {
        let err = FeeSchedule::new(vec![
            FeeTier::bounded(60_000.0, 0.05),
            FeeTier::unbounded(0.08),
        ])
        .expect_err("a progressive table is not a degressive schedule");
        assert_eq!(err, ScheduleError::RateIncreasing { index: 1, rate: 0.08 });
    }

    #[test]
    fn allows_equal_rates_across_tiers() {
        FeeSchedule::new(vec![
            FeeTier::bounded(60_000.0, 0.10),
            FeeTier::bounded(150_000.0, 0.10),
            FeeTier::unbounded(0.05),
        ])
        .expect("non-strictly decreasing rates are allowed");
    }

    #[test]
    fn zero_work_amount_resolves_to_first_tier() {
        let rate = FeeSchedule::standard()
            .resolve_rate(0.0)
            .expect("zero is a valid work amount");
        assert_eq!(rate, 0.12);
    }

    #[test]
    fn negative_work_amount_is_rejected() {
        let err = FeeSchedule::standard()
            .resolve_rate(-1.0)
            .expect_err("negative work amount");
        assert!(matches!(err, InputError::Negative { field: "work amount", .. }));
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let schedule = FeeSchedule::standard();
        assert_eq!(schedule.resolve_rate(60_000.0).unwrap(), 0.12);
        assert_eq!(schedule.resolve_rate(60_000.01).unwrap(), 0.10);
        assert_eq!(schedule.resolve_rate(1_000_000.0).unwrap(), 0.06);
        assert_eq!(schedule.resolve_rate(2_500_000.0).unwrap(), 0.05);
    }
}
