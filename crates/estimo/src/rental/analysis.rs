use super::inputs::{Financing, YieldInputs};
use super::mortgage::monthly_payment;
use crate::error::InputError;
use serde::Serialize;

/// Rates behind the computed-unless-overridden fields: notary fees as a
/// fraction of the purchase price, management and rental insurance as
/// fractions of gross annual rent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRates {
    pub notary_rate: f64,
    pub management_rate: f64,
    pub rental_insurance_rate: f64,
}

impl Default for DerivedRates {
    fn default() -> Self {
        Self {
            notary_rate: 0.08,
            management_rate: 0.07,
            rental_insurance_rate: 0.03,
        }
    }
}

/// Stateless profitability analyzer holding the derived-default rates.
/// Each call consumes one input snapshot and returns a complete result or
/// fails wholesale; there are no partial results.
#[derive(Debug, Clone, Default)]
pub struct RentalAnalyzer {
    rates: DerivedRates,
}

impl RentalAnalyzer {
    pub fn new(rates: DerivedRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> DerivedRates {
        self.rates
    }

    pub fn analyze(&self, inputs: &YieldInputs) -> Result<YieldResult, InputError> {
        check_non_negative("purchase price", inputs.purchase_price)?;
        check_non_negative("renovation costs", inputs.renovation_costs)?;
        check_non_negative("annual rent", inputs.annual_rent)?;
        check_non_negative("property tax", inputs.property_tax)?;
        check_non_negative("condo fees", inputs.condo_fees)?;
        check_non_negative("maintenance", inputs.maintenance)?;
        check_non_negative("property insurance", inputs.property_insurance)?;
        for item in &inputs.other_expenses {
            check_non_negative("annual expense", item.annual_amount)?;
        }
        if !(0.0..=100.0).contains(&inputs.vacancy_rate_pct) {
            return Err(InputError::RatioOutOfRange {
                field: "vacancy rate",
                value: inputs.vacancy_rate_pct,
            });
        }

        let notary_fees = inputs
            .notary_fees
            .resolve(inputs.purchase_price * self.rates.notary_rate);
        check_non_negative("notary fees", notary_fees)?;

        let total_investment = inputs.purchase_price + notary_fees + inputs.renovation_costs;
        if total_investment <= 0.0 {
            return Err(InputError::ZeroInvestment);
        }

        let gross_annual_income =
            inputs.annual_rent * (1.0 - inputs.vacancy_rate_pct / 100.0);

        // Management and insurance contracts price on the nominal rent, so
        // the derived defaults use the gross figure, not the haircut one.
        let management_fee = inputs
            .management_fee
            .resolve(inputs.annual_rent * self.rates.management_rate);
        check_non_negative("management fee", management_fee)?;
        let rental_insurance = inputs
            .rental_insurance
            .resolve(inputs.annual_rent * self.rates.rental_insurance_rate);
        check_non_negative("rental insurance", rental_insurance)?;

        let other: f64 = inputs
            .other_expenses
            .iter()
            .map(|item| item.annual_amount)
            .sum();
        let total_annual_expenses = inputs.property_tax
            + inputs.condo_fees
            + inputs.maintenance
            + inputs.property_insurance
            + rental_insurance
            + management_fee
            + other;

        let monthly_mortgage_payment = match inputs.financing {
            Some(Financing {
                loan_amount,
                annual_rate_pct,
                term_years,
            }) => monthly_payment(loan_amount, annual_rate_pct, term_years)?,
            None => 0.0,
        };
        let annual_debt_service = monthly_mortgage_payment * 12.0;

        let net_annual_income = gross_annual_income - total_annual_expenses;
        let annual_cashflow = net_annual_income - annual_debt_service;

        let actual_investment = match inputs.financing {
            Some(financing) => total_investment - financing.loan_amount,
            None => total_investment,
        };
        if actual_investment <= 0.0 {
            return Err(InputError::ZeroCashCommitment);
        }

        Ok(YieldResult {
            total_investment,
            actual_investment,
            notary_fees,
            management_fee,
            rental_insurance,
            gross_annual_income,
            total_annual_expenses,
            net_annual_income,
            monthly_mortgage_payment,
            annual_debt_service,
            annual_cashflow,
            gross_yield_pct: gross_annual_income / total_investment * 100.0,
            net_yield_pct: net_annual_income / total_investment * 100.0,
            roi_pct: annual_cashflow / actual_investment * 100.0,
        })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if value < 0.0 || value.is_nan() {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}

/// Complete profitability picture for one input snapshot. Ephemeral: the
/// caller discards it and asks for a new one whenever an input changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldResult {
    pub total_investment: f64,
    /// Cash actually committed by the investor (total minus any loan).
    pub actual_investment: f64,
    /// The notary fees actually used, after resolving any override.
    pub notary_fees: f64,
    pub management_fee: f64,
    pub rental_insurance: f64,
    /// Gross rent after the vacancy haircut.
    pub gross_annual_income: f64,
    pub total_annual_expenses: f64,
    pub net_annual_income: f64,
    pub monthly_mortgage_payment: f64,
    pub annual_debt_service: f64,
    pub annual_cashflow: f64,
    pub gross_yield_pct: f64,
    pub net_yield_pct: f64,
    pub roi_pct: f64,
}
