use crate::error::InputError;

/// Fixed-rate amortized monthly payment for a loan of `principal` at
/// `annual_rate_pct` percent over `years` years.
///
/// With `i` the monthly rate and `n` the number of monthly installments:
/// `payment = principal * i * (1+i)^n / ((1+i)^n - 1)`, falling back to
/// straight division when the rate is zero. The term is in whole years, so
/// a negative term is unrepresentable; a zero term is rejected.
pub fn monthly_payment(
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
) -> Result<f64, InputError> {
    if principal < 0.0 || principal.is_nan() {
        return Err(InputError::Negative {
            field: "loan principal",
            value: principal,
        });
    }
    if annual_rate_pct < 0.0 || annual_rate_pct.is_nan() {
        return Err(InputError::Negative {
            field: "annual interest rate",
            value: annual_rate_pct,
        });
    }
    if years == 0 {
        return Err(InputError::ZeroLoanTerm);
    }
    if principal == 0.0 {
        return Ok(0.0);
    }

    let installments = f64::from(years) * 12.0;
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;

    if monthly_rate == 0.0 {
        return Ok(principal / installments);
    }

    let growth = (1.0 + monthly_rate).powf(installments);
    if growth.is_infinite() {
        // The annuity factor converges to the bare monthly rate as the
        // term grows without bound.
        return Ok(principal * monthly_rate);
    }
    Ok(principal * monthly_rate * growth / (growth - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let payment = monthly_payment(120_000.0, 0.0, 10).expect("zero rate is valid");
        assert_eq!(payment, 120_000.0 / 120.0);
    }

    #[test]
    fn matches_the_standard_annuity_reference() {
        let payment = monthly_payment(150_000.0, 3.5, 20).expect("valid loan");
        assert!((payment - 869.96).abs() < 0.5, "payment was {payment}");
    }

    #[test]
    fn zero_principal_costs_nothing_at_any_rate() {
        assert_eq!(monthly_payment(0.0, 4.2, 15).expect("valid"), 0.0);
        assert_eq!(monthly_payment(0.0, 0.0, 15).expect("valid"), 0.0);
    }

    #[test]
    fn zero_term_is_rejected() {
        assert_eq!(
            monthly_payment(100_000.0, 3.0, 0),
            Err(InputError::ZeroLoanTerm)
        );
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(matches!(
            monthly_payment(-1.0, 3.0, 10),
            Err(InputError::Negative { field: "loan principal", .. })
        ));
        assert!(matches!(
            monthly_payment(100_000.0, -0.5, 10),
            Err(InputError::Negative { field: "annual interest rate", .. })
        ));
    }

    #[test]
    fn extreme_terms_stay_finite() {
        let payment = monthly_payment(100_000.0, 3.5, u32::MAX).expect("valid loan");
        assert!(payment.is_finite());
        // At the limit only interest is ever paid.
        assert!((payment - 100_000.0 * 0.035 / 12.0).abs() < 1e-6);

        let interest_free = monthly_payment(100_000.0, 0.0, u32::MAX).expect("valid loan");
        assert!(interest_free.is_finite());
        assert!(interest_free > 0.0);
    }

    #[test]
    fn repeat_calls_are_bit_identical() {
        let first = monthly_payment(150_000.0, 3.5, 20).expect("valid");
        let second = monthly_payment(150_000.0, 3.5, 20).expect("valid");
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
