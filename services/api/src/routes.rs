use crate::infra::{field_input, quote_engine, rental_analyzer, AppState, EngineSettings};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use estimo::error::AppError;
use estimo::fees::{FeeQuote, PhaseWeight};
use estimo::rental::{ExpenseItem, Financing, YieldInputs, YieldResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) work_amount: f64,
    /// Custom phase breakdown; the canonical catalogue applies when omitted.
    #[serde(default)]
    pub(crate) phases: Option<Vec<PhaseWeight>>,
    #[serde(default)]
    pub(crate) vat_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    #[serde(flatten)]
    pub(crate) quote: FeeQuote,
    pub(crate) allocated_total: f64,
    pub(crate) total_vat: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YieldRequest {
    pub(crate) purchase_price: f64,
    /// Omitted or null means "derive from the purchase price".
    #[serde(default)]
    pub(crate) notary_fees: Option<f64>,
    #[serde(default)]
    pub(crate) renovation_costs: f64,
    pub(crate) annual_rent: f64,
    #[serde(default)]
    pub(crate) vacancy_rate_pct: f64,
    #[serde(default)]
    pub(crate) property_tax: f64,
    #[serde(default)]
    pub(crate) condo_fees: f64,
    #[serde(default)]
    pub(crate) maintenance: f64,
    #[serde(default)]
    pub(crate) property_insurance: f64,
    /// Omitted or null means "derive from the annual rent".
    #[serde(default)]
    pub(crate) rental_insurance: Option<f64>,
    /// Omitted or null means "derive from the annual rent".
    #[serde(default)]
    pub(crate) management_fee: Option<f64>,
    #[serde(default)]
    pub(crate) other_expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub(crate) financing: Option<Financing>,
}

impl YieldRequest {
    fn into_inputs(self) -> YieldInputs {
        YieldInputs {
            purchase_price: self.purchase_price,
            notary_fees: field_input(self.notary_fees),
            renovation_costs: self.renovation_costs,
            annual_rent: self.annual_rent,
            vacancy_rate_pct: self.vacancy_rate_pct,
            property_tax: self.property_tax,
            condo_fees: self.condo_fees,
            maintenance: self.maintenance,
            property_insurance: self.property_insurance,
            rental_insurance: field_input(self.rental_insurance),
            management_fee: field_input(self.management_fee),
            other_expenses: self.other_expenses,
            financing: self.financing,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct YieldResponse {
    #[serde(flatten)]
    pub(crate) result: YieldResult,
}

pub(crate) fn api_router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/fees/quote", axum::routing::post(quote_endpoint))
        .route("/api/v1/rental/yield", axum::routing::post(yield_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn quote_endpoint(
    Extension(settings): Extension<EngineSettings>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let QuoteRequest {
        work_amount,
        phases,
        vat_rate,
    } = payload;

    // A request override beats the configured rate; the allocation itself
    // rejects out-of-range overrides.
    let engine = quote_engine(vat_rate.unwrap_or(settings.vat_rate));
    let quote = match phases {
        Some(weights) => engine.quote(work_amount, &weights)?,
        None => engine.quote_with_default_phases(work_amount)?,
    };

    let allocated_total = quote.allocated_total();
    let total_vat = quote.total_vat();
    Ok(Json(QuoteResponse {
        quote,
        allocated_total,
        total_vat,
    }))
}

pub(crate) async fn yield_endpoint(
    Json(payload): Json<YieldRequest>,
) -> Result<Json<YieldResponse>, AppError> {
    let result = rental_analyzer().analyze(&payload.into_inputs())?;
    Ok(Json(YieldResponse { result }))
}
