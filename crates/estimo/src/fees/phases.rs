use crate::error::InputError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Canonical engagement phases, in chronological order. The order is
/// meaningful and is preserved everywhere a breakdown is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    DesignSketch,
    PreliminaryDesign,
    DetailedDesign,
    BuildingPermit,
    ExecutionStudies,
    ContractorBidding,
    SiteOversight,
    Handover,
}

impl PhaseKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::DesignSketch,
            Self::PreliminaryDesign,
            Self::DetailedDesign,
            Self::BuildingPermit,
            Self::ExecutionStudies,
            Self::ContractorBidding,
            Self::SiteOversight,
            Self::Handover,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DesignSketch => "Design Sketch",
            Self::PreliminaryDesign => "Preliminary Design",
            Self::DetailedDesign => "Detailed Design",
            Self::BuildingPermit => "Building-Permit Filing",
            Self::ExecutionStudies => "Execution Studies",
            Self::ContractorBidding => "Contractor-Bidding Assistance",
            Self::SiteOversight => "Site-Execution Oversight",
            Self::Handover => "Handover Assistance",
        }
    }

    /// Default share of the total fee, in percent. The eight defaults sum
    /// to exactly 100.
    pub const fn default_share(self) -> f64 {
        match self {
            Self::DesignSketch => 5.0,
            Self::PreliminaryDesign => 10.0,
            Self::DetailedDesign => 20.0,
            Self::BuildingPermit => 10.0,
            Self::ExecutionStudies => 15.0,
            Self::ContractorBidding => 10.0,
            Self::SiteOversight => 25.0,
            Self::Handover => 5.0,
        }
    }
}

/// One editable row of a phase breakdown: a phase name and its share of the
/// total fee in percent. Users tune these per quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeight {
    pub name: String,
    pub percentage: f64,
}

impl PhaseWeight {
    /// The canonical eight-phase breakdown with default shares.
    pub fn catalogue() -> Vec<PhaseWeight> {
        PhaseKind::ordered()
            .into_iter()
            .map(|phase| PhaseWeight {
                name: phase.label().to_string(),
                percentage: phase.default_share(),
            })
            .collect()
    }
}

/// A single allocated phase: the share applied to the fee total, the amount
/// rounded to the nearest currency unit, and the VAT on that amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLine {
    pub name: String,
    pub percentage: f64,
    pub amount: f64,
    pub vat_amount: f64,
}

/// Result of distributing a fee total across phases. The allocation is
/// always returned, even when the shares do not sum to 100: in-progress
/// edits routinely pass through inconsistent states and still want live
/// figures. `percentage_sum_invalid` carries the warning instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseAllocation {
    pub lines: Vec<PhaseLine>,
    pub percentage_sum: f64,
    pub percentage_sum_invalid: bool,
}

/// Tolerance on the percentage-sum check, absorbing float rounding from
/// interactive edits.
pub const PERCENTAGE_SUM_TOLERANCE: f64 = 0.01;

fn round_to_unit(value: f64) -> f64 {
    value.round()
}

fn round_to_cent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distributes `total_fees` across `weights`, preserving their order. Every
/// line is recomputed from scratch on every call; no amount survives from a
/// previous allocation. Per-line amounts are rounded independently, so the
/// rounded sum may drift from `total_fees` by up to half a unit per line.
pub fn allocate(
    total_fees: f64,
    weights: &[PhaseWeight],
    vat_rate: f64,
) -> Result<PhaseAllocation, InputError> {
    if total_fees < 0.0 || total_fees.is_nan() {
        return Err(InputError::Negative {
            field: "total fees",
            value: total_fees,
        });
    }

    if !(0.0..1.0).contains(&vat_rate) {
        return Err(InputError::FractionOutOfRange {
            field: "vat rate",
            value: vat_rate,
        });
    }

    for weight in weights {
        if weight.percentage < 0.0 || weight.percentage.is_nan() {
            return Err(InputError::Negative {
                field: "phase percentage",
                value: weight.percentage,
            });
        }
    }

    let percentage_sum: f64 = weights.iter().map(|weight| weight.percentage).sum();
    let percentage_sum_invalid = (percentage_sum - 100.0).abs() > PERCENTAGE_SUM_TOLERANCE;
    if percentage_sum_invalid {
        warn!(
            sum = percentage_sum,
            "phase percentages do not sum to 100; returning best-effort allocation"
        );
    }

    let lines = weights
        .iter()
        .map(|weight| {
            let amount = round_to_unit(total_fees * weight.percentage / 100.0);
            PhaseLine {
                name: weight.name.clone(),
                percentage: weight.percentage,
                amount,
                vat_amount: round_to_cent(amount * vat_rate),
            }
        })
        .collect();

    Ok(PhaseAllocation {
        lines,
        percentage_sum,
        percentage_sum_invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::STANDARD_VAT_RATE;

    #[test]
    fn catalogue_shares_sum_to_one_hundred() {
        let sum: f64 = PhaseKind::ordered()
            .into_iter()
            .map(PhaseKind::default_share)
            .sum();
        assert_eq!(sum, 100.0);
    }

    #[test]
    fn allocation_preserves_input_order() {
        let weights = PhaseWeight::catalogue();
        let allocation =
            allocate(24_000.0, &weights, STANDARD_VAT_RATE).expect("valid allocation");
        let names: Vec<&str> = allocation.lines.iter().map(|line| line.name.as_str()).collect();
        let expected: Vec<&str> = weights.iter().map(|weight| weight.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn consistent_weights_are_not_flagged() {
        let allocation = allocate(24_000.0, &PhaseWeight::catalogue(), STANDARD_VAT_RATE)
            .expect("valid allocation");
        assert!(!allocation.percentage_sum_invalid);
        assert_eq!(allocation.percentage_sum, 100.0);
    }

    #[test]
    fn inconsistent_sum_is_flagged_but_still_allocated() {
        let weights = vec![
            PhaseWeight {
                name: "Design Sketch".to_string(),
                percentage: 30.0,
            },
            PhaseWeight {
                name: "Handover Assistance".to_string(),
                percentage: 30.0,
            },
        ];
        let allocation =
            allocate(10_000.0, &weights, STANDARD_VAT_RATE).expect("best-effort allocation");
        assert!(allocation.percentage_sum_invalid);
        assert_eq!(allocation.lines.len(), 2);
        assert_eq!(allocation.lines[0].amount, 3_000.0);
    }

    #[test]
    fn sum_within_tolerance_is_accepted() {
        let weights = vec![
            PhaseWeight {
                name: "A".to_string(),
                percentage: 33.33,
            },
            PhaseWeight {
                name: "B".to_string(),
                percentage: 33.33,
            },
            PhaseWeight {
                name: "C".to_string(),
                percentage: 33.34,
            },
        ];
        let allocation = allocate(9_000.0, &weights, STANDARD_VAT_RATE).expect("valid");
        assert!(!allocation.percentage_sum_invalid);
    }

    #[test]
    fn rounded_amounts_stay_close_to_the_total() {
        let weights = PhaseWeight::catalogue();
        let total_fees = 12_345.67;
        let allocation = allocate(total_fees, &weights, STANDARD_VAT_RATE).expect("valid");
        let allocated: f64 = allocation.lines.iter().map(|line| line.amount).sum();
        assert!((allocated - total_fees).abs() <= weights.len() as f64 * 0.5);
    }

    #[test]
    fn vat_follows_each_line() {
        let weights = vec![PhaseWeight {
            name: "Site-Execution Oversight".to_string(),
            percentage: 100.0,
        }];
        let allocation = allocate(1_000.0, &weights, 0.20).expect("valid");
        assert_eq!(allocation.lines[0].amount, 1_000.0);
        assert_eq!(allocation.lines[0].vat_amount, 200.0);
    }

    #[test]
    fn negative_percentage_is_rejected() {
        let weights = vec![PhaseWeight {
            name: "Design Sketch".to_string(),
            percentage: -5.0,
        }];
        let err = allocate(1_000.0, &weights, STANDARD_VAT_RATE).expect_err("negative share");
        assert!(matches!(err, InputError::Negative { field: "phase percentage", .. }));
    }

    #[test]
    fn out_of_range_vat_rate_is_rejected() {
        let weights = PhaseWeight::catalogue();
        let negative = allocate(1_000.0, &weights, -0.05).expect_err("negative vat rate");
        assert!(matches!(
            negative,
            InputError::FractionOutOfRange { field: "vat rate", .. }
        ));
        let nan = allocate(1_000.0, &weights, f64::NAN).expect_err("NaN vat rate");
        assert!(matches!(
            nan,
            InputError::FractionOutOfRange { field: "vat rate", .. }
        ));
    }

    #[test]
    fn zero_total_allocates_zero_everywhere() {
        let allocation = allocate(0.0, &PhaseWeight::catalogue(), STANDARD_VAT_RATE)
            .expect("zero total is valid");
        assert!(allocation.lines.iter().all(|line| line.amount == 0.0));
    }
}
