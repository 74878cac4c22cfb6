use serde::{Deserialize, Serialize};

/// A field that is computed from a default formula until the user takes it
/// over. Recomputation only ever touches `Auto` fields; a `Manual` value is
/// never clobbered, even when the quantity it was derived from changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInput {
    #[default]
    Auto,
    Manual(f64),
}

impl FieldInput {
    /// The effective value: the manual override if present, else `auto`.
    pub fn resolve(self, auto: f64) -> f64 {
        match self {
            Self::Auto => auto,
            Self::Manual(value) => value,
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual(_))
    }
}

/// Financing terms for a leveraged acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub loan_amount: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
}

/// An extra named annual cost beyond the built-in recurring expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub label: String,
    pub annual_amount: f64,
}

/// Everything a rental-profitability analysis consumes, as one immutable
/// snapshot. Callers rebuild the snapshot and re-run the analysis on every
/// edit; nothing in here is recomputed incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldInputs {
    // Acquisition
    pub purchase_price: f64,
    /// Defaults to a fraction of the purchase price until overridden.
    #[serde(default)]
    pub notary_fees: FieldInput,
    #[serde(default)]
    pub renovation_costs: f64,

    // Income
    pub annual_rent: f64,
    /// Flat haircut on gross rent, in percent.
    #[serde(default)]
    pub vacancy_rate_pct: f64,

    // Recurring expenses
    #[serde(default)]
    pub property_tax: f64,
    #[serde(default)]
    pub condo_fees: f64,
    #[serde(default)]
    pub maintenance: f64,
    #[serde(default)]
    pub property_insurance: f64,
    /// Defaults to a fraction of gross annual rent until overridden.
    #[serde(default)]
    pub rental_insurance: FieldInput,
    /// Defaults to a fraction of gross annual rent until overridden.
    #[serde(default)]
    pub management_fee: FieldInput,
    #[serde(default)]
    pub other_expenses: Vec<ExpenseItem>,

    // Financing; `None` means a cash purchase.
    #[serde(default)]
    pub financing: Option<Financing>,
}

impl YieldInputs {
    /// A cash purchase with only the mandatory figures filled in; derived
    /// fields stay `Auto` and the optional expense columns stay zero.
    pub fn cash_purchase(purchase_price: f64, annual_rent: f64) -> Self {
        Self {
            purchase_price,
            notary_fees: FieldInput::Auto,
            renovation_costs: 0.0,
            annual_rent,
            vacancy_rate_pct: 0.0,
            property_tax: 0.0,
            condo_fees: 0.0,
            maintenance: 0.0,
            property_insurance: 0.0,
            rental_insurance: FieldInput::Auto,
            management_fee: FieldInput::Auto,
            other_expenses: Vec::new(),
            financing: None,
        }
    }
}
