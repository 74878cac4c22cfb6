use estimo::fees::{FeeSchedule, QuoteEngine};
use estimo::rental::{DerivedRates, FieldInput, RentalAnalyzer};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine defaults resolved from configuration at startup. Request-level
/// overrides still win over these.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EngineSettings {
    pub(crate) vat_rate: f64,
}

pub(crate) fn quote_engine(vat_rate: f64) -> QuoteEngine {
    QuoteEngine::new(FeeSchedule::standard(), vat_rate)
}

pub(crate) fn rental_analyzer() -> RentalAnalyzer {
    RentalAnalyzer::new(DerivedRates::default())
}

/// Request-side convention: an omitted or `null` field means "derive it".
pub(crate) fn field_input(value: Option<f64>) -> FieldInput {
    match value {
        Some(value) => FieldInput::Manual(value),
        None => FieldInput::Auto,
    }
}
