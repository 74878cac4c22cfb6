pub mod phases;
pub mod schedule;

pub use phases::{allocate, PhaseAllocation, PhaseKind, PhaseLine, PhaseWeight};
pub use schedule::{FeeSchedule, FeeTier, ScheduleError};

use crate::error::InputError;
use serde::Serialize;

/// Standard VAT rate applied to professional fees, as a fraction.
pub const STANDARD_VAT_RATE: f64 = 0.20;

/// Stateless quoting engine: a validated fee schedule plus the VAT rate.
/// Every quote is computed fresh from its inputs; the engine holds no
/// per-quote state.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    schedule: FeeSchedule,
    vat_rate: f64,
}

impl QuoteEngine {
    pub fn new(schedule: FeeSchedule, vat_rate: f64) -> Self {
        Self { schedule, vat_rate }
    }

    /// Engine over the published schedule and standard VAT rate.
    pub fn standard() -> Self {
        Self::new(FeeSchedule::standard(), STANDARD_VAT_RATE)
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Produces a complete quote for a work amount: resolves the degressive
    /// rate, derives the fee total, and distributes it across the given
    /// phase weights. A changed work amount means a wholly new quote; no
    /// field of an existing quote is ever patched in place.
    pub fn quote(&self, work_amount: f64, weights: &[PhaseWeight]) -> Result<FeeQuote, InputError> {
        let fee_rate = self.schedule.resolve_rate(work_amount)?;
        let total_fees = work_amount * fee_rate;
        let allocation = phases::allocate(total_fees, weights, self.vat_rate)?;

        Ok(FeeQuote {
            work_amount,
            fee_rate,
            total_fees,
            phases: allocation.lines,
            percentage_sum: allocation.percentage_sum,
            percentage_sum_invalid: allocation.percentage_sum_invalid,
        })
    }

    /// Quote with the canonical eight-phase breakdown and default shares.
    pub fn quote_with_default_phases(&self, work_amount: f64) -> Result<FeeQuote, InputError> {
        self.quote(work_amount, &PhaseWeight::catalogue())
    }
}

/// An immutable fee quote: the work amount, the resolved rate, the exact
/// (unrounded) fee total, and the per-phase breakdown. `total_fees` is kept
/// exact so callers can reconcile the independently rounded phase amounts
/// against it if they need to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeQuote {
    pub work_amount: f64,
    pub fee_rate: f64,
    pub total_fees: f64,
    pub phases: Vec<PhaseLine>,
    pub percentage_sum: f64,
    pub percentage_sum_invalid: bool,
}

impl FeeQuote {
    /// Sum of the rounded phase amounts. May drift from `total_fees` by up
    /// to half a currency unit per phase.
    pub fn allocated_total(&self) -> f64 {
        self.phases.iter().map(|line| line.amount).sum()
    }

    pub fn total_vat(&self) -> f64 {
        self.phases.iter().map(|line| line.vat_amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_applies_resolved_rate_to_work_amount() {
        let quote = QuoteEngine::standard()
            .quote_with_default_phases(250_000.0)
            .expect("valid quote");
        assert_eq!(quote.fee_rate, 0.08);
        assert_eq!(quote.total_fees, 20_000.0);
        assert_eq!(quote.phases.len(), 8);
        assert!(!quote.percentage_sum_invalid);
    }

    #[test]
    fn zero_work_amount_yields_zero_fees() {
        let quote = QuoteEngine::standard()
            .quote_with_default_phases(0.0)
            .expect("zero budget is quotable");
        assert_eq!(quote.fee_rate, 0.12);
        assert_eq!(quote.total_fees, 0.0);
        assert_eq!(quote.allocated_total(), 0.0);
    }

    #[test]
    fn quote_rejects_negative_work_amount() {
        let err = QuoteEngine::standard()
            .quote_with_default_phases(-10.0)
            .expect_err("negative budget");
        assert!(matches!(err, InputError::Negative { .. }));
    }

    #[test]
    fn edited_weights_flow_through_the_quote() {
        let mut weights = PhaseWeight::catalogue();
        weights[0].percentage = 50.0;
        let quote = QuoteEngine::standard()
            .quote(100_000.0, &weights)
            .expect("best-effort quote");
        assert!(quote.percentage_sum_invalid);
        assert_eq!(quote.phases[0].amount, 5_000.0);
    }
}
