use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::field::SurveyField;
use super::gateway::{Prediction, PredictionError};
use super::risk::{Assessment, AssessmentView};
use super::schema::{EncodedAnswers, FormSchema, ValidationError};
use super::value::RawValue;

/// Banner shown for every transport or response failure. The cause is logged,
/// never displayed.
pub const PREDICTION_FAILURE_MESSAGE: &str =
    "Failed to get prediction. Please ensure the backend server is running and try again.";

pub const SUBMIT_LABEL: &str = "Get Diabetes Risk Prediction";
pub const SUBMITTING_LABEL: &str = "Getting Prediction...";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded { assessment: Assessment },
    Failed { message: String },
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Succeeded { .. } => "succeeded",
            SubmissionStatus::Failed { .. } => "failed",
        }
    }
}

/// Inputs to the form state machine.
#[derive(Debug)]
pub enum FormEvent {
    FieldEdited { field: SurveyField, value: RawValue },
    SubmitRequested,
    PredictionReceived(Prediction),
    PredictionFailed(PredictionError),
}

/// Result of applying one event. `request` is set only when the event opened a
/// new submission cycle and the caller must send these answers.
#[derive(Debug)]
pub struct Transition {
    pub state: FormState,
    pub request: Option<EncodedAnswers>,
}

/// State of one respondent's form session.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    values: BTreeMap<SurveyField, RawValue>,
    errors: BTreeMap<SurveyField, ValidationError>,
    status: SubmissionStatus,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FormSchema::standard())
    }
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            status: SubmissionStatus::Idle,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn value(&self, field: SurveyField) -> &RawValue {
        static EMPTY: RawValue = RawValue::Empty;
        self.values.get(&field).unwrap_or(&EMPTY)
    }

    pub fn values(&self) -> &BTreeMap<SurveyField, RawValue> {
        &self.values
    }

    pub fn errors(&self) -> &BTreeMap<SurveyField, ValidationError> {
        &self.errors
    }

    pub fn error_message(&self, field: SurveyField) -> Option<String> {
        self.errors.get(&field).map(ToString::to_string)
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.status {
            SubmissionStatus::Succeeded { assessment } => Some(assessment),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            status: self.status.label(),
            submit_label: self.submit_label(),
            errors: self
                .errors
                .iter()
                .map(|(field, error)| (*field, error.to_string()))
                .collect(),
            failure_message: self.failure_message().map(str::to_string),
            assessment: self.assessment().map(Assessment::view),
        }
    }
}

/// Apply one event to a form session.
pub fn reduce(mut state: FormState, event: FormEvent) -> Transition {
    let mut request = None;

    match event {
        FormEvent::FieldEdited { field, value } => {
            match state.schema.validate(field, &value) {
                Ok(_) => {
                    state.errors.remove(&field);
                }
                Err(error) => {
                    state.errors.insert(field, error);
                }
            }
            state.values.insert(field, value);
        }
        FormEvent::SubmitRequested => {
            if state.is_submitting() {
                debug!("submission already in flight; ignoring submit");
            } else {
                match state.schema.validate_all(&state.values) {
                    Ok(answers) => {
                        state.errors.clear();
                        state.status = SubmissionStatus::Submitting;
                        request = Some(answers);
                    }
                    Err(errors) => {
                        info!(
                            invalid_fields = errors.len(),
                            "submission blocked by validation"
                        );
                        state.errors = errors;
                    }
                }
            }
        }
        FormEvent::PredictionReceived(prediction) => {
            if state.is_submitting() {
                let assessment = Assessment::new(prediction.probability, prediction.prediction);
                info!(
                    probability = assessment.probability,
                    tier = assessment.label(),
                    "prediction received"
                );
                state.status = SubmissionStatus::Succeeded { assessment };
            } else {
                warn!(
                    status = state.status.label(),
                    "ignoring prediction outside a submission"
                );
            }
        }
        FormEvent::PredictionFailed(err) => {
            if state.is_submitting() {
                error!(error = %err, "prediction request failed");
                state.status = SubmissionStatus::Failed {
                    message: PREDICTION_FAILURE_MESSAGE.to_string(),
                };
            } else {
                warn!(
                    status = state.status.label(),
                    error = %err,
                    "ignoring prediction failure outside a submission"
                );
            }
        }
    }

    Transition { state, request }
}

/// Serializable snapshot of a session for HTTP and CLI rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub status: &'static str,
    pub submit_label: &'static str,
    pub errors: BTreeMap<SurveyField, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentView>,
}
