use diabetes_survey::config::PredictionServiceConfig;
use diabetes_survey::error::AppError;
use diabetes_survey::survey::{HttpPredictionClient, RawValue, SurveyField};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn prediction_client(
    config: &PredictionServiceConfig,
) -> Result<Arc<HttpPredictionClient>, AppError> {
    Ok(Arc::new(HttpPredictionClient::new(config)?))
}

/// Parses a `Field=value` pair. The value may be empty to leave the answer blank.
pub(crate) fn parse_answer(raw: &str) -> Result<(SurveyField, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Field=value, got '{raw}'"))?;
    let field = name.parse::<SurveyField>().map_err(|err| err.to_string())?;
    Ok((field, value.trim().to_string()))
}

/// Reads a JSON object of field name to answer. Keys are checked later by the
/// form session so unknown names surface as schema errors.
pub(crate) fn load_answers_file(path: &Path) -> Result<BTreeMap<String, RawValue>, AppError> {
    let contents = std::fs::read(path)?;
    Ok(serde_json::from_slice(&contents)?)
}
