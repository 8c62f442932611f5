use std::sync::Arc;

use super::field::SurveyField;
use super::gateway::{Prediction, PredictionError, PredictionGateway};
use super::schema::{EncodedAnswers, SchemaError, ValidationError};
use super::state::{reduce, FormEvent, FormState, SubmissionStatus};
use super::value::RawValue;

/// Drives one form session: feeds edits and submits through the reducer and
/// sends the single outbound request a submission cycle allows.
pub struct SubmissionController<G> {
    state: FormState,
    gateway: Arc<G>,
}

impl<G> SubmissionController<G>
where
    G: PredictionGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_state(FormState::default(), gateway)
    }

    pub fn with_state(state: FormState, gateway: Arc<G>) -> Self {
        Self { state, gateway }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn into_state(self) -> FormState {
        self.state
    }

    fn dispatch(&mut self, event: FormEvent) -> Option<EncodedAnswers> {
        let state = std::mem::take(&mut self.state);
        let transition = reduce(state, event);
        self.state = transition.state;
        transition.request
    }

    /// Record an answer and return the field's current validation error, if any.
    pub fn edit(
        &mut self,
        field: SurveyField,
        value: impl Into<RawValue>,
    ) -> Option<&ValidationError> {
        self.dispatch(FormEvent::FieldEdited {
            field,
            value: value.into(),
        });
        self.state.errors().get(&field)
    }

    /// Record an answer addressed by its wire name.
    pub fn edit_named(
        &mut self,
        name: &str,
        value: impl Into<RawValue>,
    ) -> Result<Option<&ValidationError>, SchemaError> {
        let field = name.parse::<SurveyField>()?;
        Ok(self.edit(field, value))
    }

    /// Open a submission cycle. Returns the answers to send, or `None` when
    /// validation failed or a request is already outstanding.
    pub fn begin_submit(&mut self) -> Option<EncodedAnswers> {
        self.dispatch(FormEvent::SubmitRequested)
    }

    /// Resolve the outstanding submission cycle.
    pub fn complete(&mut self, outcome: Result<Prediction, PredictionError>) -> &SubmissionStatus {
        let event = match outcome {
            Ok(prediction) => FormEvent::PredictionReceived(prediction),
            Err(err) => FormEvent::PredictionFailed(err),
        };
        self.dispatch(event);
        self.state.status()
    }

    /// Run a full submission cycle against the gateway.
    pub async fn submit(&mut self) -> &SubmissionStatus {
        let Some(answers) = self.begin_submit() else {
            return self.state.status();
        };

        let outcome = self.gateway.predict(&answers).await;
        self.complete(outcome)
    }
}
