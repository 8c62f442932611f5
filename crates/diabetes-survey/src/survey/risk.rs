use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const HIGH_RISK_THRESHOLD: f64 = 0.70;
const MODERATE_RISK_THRESHOLD: f64 = 0.50;

pub const DISCLAIMER: &str = "Disclaimer: This is a prediction based on a machine learning model and not a medical diagnosis. Please consult a healthcare professional.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk of Diabetes",
            RiskTier::Moderate => "Moderate Risk of Diabetes",
            RiskTier::High => "High Risk of Diabetes",
        }
    }

    /// Display tone for UIs (green/amber/red banner).
    pub const fn tone(self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Moderate => "amber",
            RiskTier::High => "red",
        }
    }
}

/// Map a probability onto a risk tier. Thresholds are inclusive on their lower
/// edge and are applied to any input, including values outside `[0, 1]`.
pub fn classify(probability: f64) -> RiskTier {
    if probability >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if probability >= MODERATE_RISK_THRESHOLD {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

/// Classified outcome of one successful submission cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub probability: f64,
    pub tier: RiskTier,
    /// Binary class echoed by the service, when it sends one.
    pub prediction: Option<u8>,
    pub received_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(probability: f64, prediction: Option<u8>) -> Self {
        Self {
            probability,
            tier: classify(probability),
            prediction,
            received_at: Utc::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.tier.label()
    }

    /// Probability as a percentage with two decimals, e.g. `82.00%`.
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "The model predicts a {} probability of having diabetes.",
            self.percentage()
        )
    }

    pub fn view(&self) -> AssessmentView {
        AssessmentView {
            risk_tier: self.tier,
            risk_label: self.label(),
            tone: self.tier.tone(),
            probability: self.probability,
            percentage: self.percentage(),
            prediction: self.prediction,
            summary: self.summary(),
            disclaimer: DISCLAIMER,
            received_at: self.received_at,
        }
    }
}

/// Presentation payload for a classified result.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub risk_tier: RiskTier,
    pub risk_label: &'static str,
    pub tone: &'static str,
    pub probability: f64,
    pub percentage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
    pub summary: String,
    pub disclaimer: &'static str,
    pub received_at: DateTime<Utc>,
}
