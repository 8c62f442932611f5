use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use super::schema::EncodedAnswers;
use crate::config::PredictionServiceConfig;

/// Decoded body of a successful `/predict` call.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Prediction {
    pub probability: f64,
    #[serde(default, deserialize_with = "class_label")]
    pub prediction: Option<u8>,
}

/// The class is informational; any shape other than a small whole number
/// (`1`, `1.0`, `"1"`) is dropped rather than failing the response.
fn class_label<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(number
        .filter(|number| number.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(number))
        .map(|number| number as u8))
}

/// Everything that can go wrong between sending the answers and holding a
/// usable probability. Detail is for operators; respondents see a banner.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction client misconfigured: {0}")]
    Configuration(String),
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("prediction response was malformed: {0}")]
    Malformed(String),
    #[error("prediction probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

/// Outbound seam to the remote model so the controller can be driven by stubs.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    async fn predict(&self, answers: &EncodedAnswers) -> Result<Prediction, PredictionError>;
}

/// JSON-over-HTTP client for `POST {base}/predict`.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(config: &PredictionServiceConfig) -> Result<Self, PredictionError> {
        let endpoint = predict_endpoint(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| PredictionError::Configuration(err.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionGateway for HttpPredictionClient {
    async fn predict(&self, answers: &EncodedAnswers) -> Result<Prediction, PredictionError> {
        debug!(endpoint = %self.endpoint, fields = answers.len(), "submitting survey answers");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(answers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        decode_prediction(&body)
    }
}

fn predict_endpoint(base_url: &str) -> Result<Url, PredictionError> {
    let raw = format!("{}/predict", base_url.trim().trim_end_matches('/'));
    Url::parse(&raw).map_err(|err| PredictionError::Configuration(format!("{raw}: {err}")))
}

/// Parse a `/predict` body, rejecting probabilities a well-behaved model
/// cannot produce.
pub fn decode_prediction(body: &[u8]) -> Result<Prediction, PredictionError> {
    let prediction: Prediction =
        serde_json::from_slice(body).map_err(|err| PredictionError::Malformed(err.to_string()))?;

    if !prediction.probability.is_finite() || !(0.0..=1.0).contains(&prediction.probability) {
        return Err(PredictionError::ProbabilityOutOfRange(
            prediction.probability,
        ));
    }

    Ok(prediction)
}
