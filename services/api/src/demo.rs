use clap::Args;
use estimo::config::AppConfig;
use estimo::error::AppError;
use estimo::fees::{FeeSchedule, QuoteEngine};
use estimo::rental::{Financing, RentalAnalyzer, YieldInputs};

use crate::infra::field_input;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Estimated cost of the construction works, excluding fees
    #[arg(long)]
    pub(crate) work_amount: f64,
    /// VAT rate as a fraction (defaults to the standard rate)
    #[arg(long)]
    pub(crate) vat_rate: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct YieldArgs {
    /// Purchase price of the property
    #[arg(long)]
    pub(crate) purchase_price: f64,
    /// Gross annual rent
    #[arg(long)]
    pub(crate) annual_rent: f64,
    /// Notary fees; derived from the purchase price when omitted
    #[arg(long)]
    pub(crate) notary_fees: Option<f64>,
    /// Renovation budget
    #[arg(long, default_value_t = 0.0)]
    pub(crate) renovation_costs: f64,
    /// Vacancy haircut on gross rent, in percent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) vacancy_rate: f64,
    /// Annual property tax
    #[arg(long, default_value_t = 0.0)]
    pub(crate) property_tax: f64,
    /// Annual condominium fees
    #[arg(long, default_value_t = 0.0)]
    pub(crate) condo_fees: f64,
    /// Annual maintenance budget
    #[arg(long, default_value_t = 0.0)]
    pub(crate) maintenance: f64,
    /// Annual property insurance
    #[arg(long, default_value_t = 0.0)]
    pub(crate) property_insurance: f64,
    /// Annual rental (unpaid-rent) insurance; derived from rent when omitted
    #[arg(long)]
    pub(crate) rental_insurance: Option<f64>,
    /// Annual management fee; derived from rent when omitted
    #[arg(long)]
    pub(crate) management_fee: Option<f64>,
    /// Loan amount; omit for a cash purchase
    #[arg(long)]
    pub(crate) loan_amount: Option<f64>,
    /// Annual loan interest rate, in percent
    #[arg(long, default_value_t = 3.5)]
    pub(crate) loan_rate: f64,
    /// Loan term, in years
    #[arg(long, default_value_t = 20)]
    pub(crate) loan_years: u32,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let vat_rate = match args.vat_rate {
        Some(rate) => rate,
        None => AppConfig::load()?.engine.vat_rate,
    };
    let engine = QuoteEngine::new(FeeSchedule::standard(), vat_rate);
    let quote = engine.quote_with_default_phases(args.work_amount)?;

    println!(
        "Fee quote generated on {}",
        chrono::Local::now().format("%Y-%m-%d")
    );
    println!(
        "Work amount {:>12.2} | fee rate {:.1}% | total fees {:>12.2}",
        quote.work_amount,
        quote.fee_rate * 100.0,
        quote.total_fees
    );
    println!("Phase breakdown:");
    for line in &quote.phases {
        println!(
            "  - {:<30} {:>5.1}% | net {:>10.2} | VAT {:>9.2} | gross {:>10.2}",
            line.name,
            line.percentage,
            line.amount,
            line.vat_amount,
            line.amount + line.vat_amount
        );
    }
    println!(
        "Allocated total {:.2} (exact fee total {:.2})",
        quote.allocated_total(),
        quote.total_fees
    );
    if quote.percentage_sum_invalid {
        println!(
            "Warning: phase shares sum to {:.2}%, not 100%",
            quote.percentage_sum
        );
    }

    Ok(())
}

pub(crate) fn run_yield(args: YieldArgs) -> Result<(), AppError> {
    let inputs = YieldInputs {
        purchase_price: args.purchase_price,
        notary_fees: field_input(args.notary_fees),
        renovation_costs: args.renovation_costs,
        annual_rent: args.annual_rent,
        vacancy_rate_pct: args.vacancy_rate,
        property_tax: args.property_tax,
        condo_fees: args.condo_fees,
        maintenance: args.maintenance,
        property_insurance: args.property_insurance,
        rental_insurance: field_input(args.rental_insurance),
        management_fee: field_input(args.management_fee),
        other_expenses: Vec::new(),
        financing: args.loan_amount.map(|loan_amount| Financing {
            loan_amount,
            annual_rate_pct: args.loan_rate,
            term_years: args.loan_years,
        }),
    };

    let result = RentalAnalyzer::default().analyze(&inputs)?;

    println!(
        "Rental analysis generated on {}",
        chrono::Local::now().format("%Y-%m-%d")
    );
    println!(
        "Total investment {:>12.2} (notary fees {:.2}) | cash committed {:>12.2}",
        result.total_investment, result.notary_fees, result.actual_investment
    );
    println!(
        "Income {:>10.2}/yr after vacancy | expenses {:>10.2}/yr | debt service {:>10.2}/yr",
        result.gross_annual_income, result.total_annual_expenses, result.annual_debt_service
    );
    if result.monthly_mortgage_payment > 0.0 {
        println!(
            "Mortgage payment {:>10.2}/month",
            result.monthly_mortgage_payment
        );
    }
    println!(
        "Gross yield {:>6.2}% | net yield {:>6.2}% | cash-flow {:>10.2}/yr | ROI {:>6.2}%",
        result.gross_yield_pct, result.net_yield_pct, result.annual_cashflow, result.roi_pct
    );

    Ok(())
}
