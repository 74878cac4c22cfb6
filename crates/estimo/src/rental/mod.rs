pub mod analysis;
pub mod inputs;
pub mod mortgage;

pub use analysis::{DerivedRates, RentalAnalyzer, YieldResult};
pub use inputs::{ExpenseItem, FieldInput, Financing, YieldInputs};
pub use mortgage::monthly_payment;
