use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{Map, Value};

use crate::survey::controller::SubmissionController;
use crate::survey::field::SurveyField;
use crate::survey::gateway::{Prediction, PredictionError, PredictionGateway};
use crate::survey::schema::EncodedAnswers;
use crate::survey::state::{reduce, FormEvent, FormState};

pub(super) fn valid_answers() -> Vec<(SurveyField, &'static str)> {
    vec![
        (SurveyField::HighBp, "1"),
        (SurveyField::HighChol, "1"),
        (SurveyField::CholCheck, "1"),
        (SurveyField::Bmi, "31.4"),
        (SurveyField::Smoker, "0"),
        (SurveyField::Stroke, "0"),
        (SurveyField::HeartDiseaseOrAttack, "0"),
        (SurveyField::PhysActivity, "1"),
        (SurveyField::Fruits, "1"),
        (SurveyField::Veggies, "1"),
        (SurveyField::HvyAlcoholConsump, "0"),
        (SurveyField::AnyHealthcare, "1"),
        (SurveyField::NoDocBcCost, "0"),
        (SurveyField::GenHlth, "3"),
        (SurveyField::MentHlth, "2"),
        (SurveyField::PhysHlth, "5"),
        (SurveyField::DiffWalk, "0"),
        (SurveyField::Sex, "1"),
        (SurveyField::Age, "57"),
        (SurveyField::Education, "5"),
        (SurveyField::Income, "6"),
    ]
}

pub(super) fn filled_state() -> FormState {
    valid_answers()
        .into_iter()
        .fold(FormState::default(), |state, (field, value)| {
            reduce(
                state,
                FormEvent::FieldEdited {
                    field,
                    value: value.into(),
                },
            )
            .state
        })
}

pub(super) fn filled_state_without(missing: SurveyField) -> FormState {
    valid_answers()
        .into_iter()
        .filter(|(field, _)| *field != missing)
        .fold(FormState::default(), |state, (field, value)| {
            reduce(
                state,
                FormEvent::FieldEdited {
                    field,
                    value: value.into(),
                },
            )
            .state
        })
}

pub(super) fn submitting_state() -> FormState {
    let transition = reduce(filled_state(), FormEvent::SubmitRequested);
    assert!(transition.request.is_some(), "valid form opens a cycle");
    transition.state
}

#[derive(Debug, Clone, Copy)]
pub(super) enum StubResponse {
    Probability(f64),
    Unavailable,
}

/// Gateway double that records every outbound request.
pub(super) struct StubGateway {
    response: StubResponse,
    calls: AtomicUsize,
    last_answers: Mutex<Option<EncodedAnswers>>,
}

impl StubGateway {
    pub(super) fn new(response: StubResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last_answers: Mutex::new(None),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_answers(&self) -> Option<EncodedAnswers> {
        self.last_answers.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl PredictionGateway for StubGateway {
    async fn predict(&self, answers: &EncodedAnswers) -> Result<Prediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_answers.lock().expect("stub mutex poisoned") = Some(answers.clone());
        match self.response {
            StubResponse::Probability(probability) => Ok(Prediction {
                probability,
                prediction: Some(u8::from(probability >= 0.5)),
            }),
            StubResponse::Unavailable => Err(PredictionError::Status {
                status: 503,
                body: "model unavailable".to_string(),
            }),
        }
    }
}

pub(super) fn filled_controller(
    response: StubResponse,
) -> (SubmissionController<StubGateway>, Arc<StubGateway>) {
    let gateway = Arc::new(StubGateway::new(response));
    let mut controller = SubmissionController::new(gateway.clone());
    for (field, value) in valid_answers() {
        controller.edit(field, value);
    }
    (controller, gateway)
}

pub(super) fn valid_answers_json() -> Value {
    let answers: Map<String, Value> = valid_answers()
        .into_iter()
        .map(|(field, value)| (field.name().to_string(), Value::from(value)))
        .collect();
    Value::Object(answers)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
