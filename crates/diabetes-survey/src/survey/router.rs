use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::controller::SubmissionController;
use super::field::SurveyField;
use super::gateway::PredictionGateway;
use super::risk::DISCLAIMER;
use super::schema::{FieldSpec, FormSchema};
use super::state::{SubmissionStatus, SUBMIT_LABEL};
use super::value::RawValue;

/// Router exposing the questionnaire, per-field checks, and assessments.
pub fn survey_router<G>(gateway: Arc<G>) -> Router
where
    G: PredictionGateway + 'static,
{
    Router::new()
        .route("/api/v1/survey/schema", get(schema_handler))
        .route(
            "/api/v1/survey/fields/:field/validate",
            post(validate_field_handler),
        )
        .route(
            "/api/v1/survey/assessments",
            post(assessment_handler::<G>),
        )
        .with_state(gateway)
}

#[derive(Debug, Serialize)]
pub struct SchemaView {
    pub sections: Vec<SectionView>,
    pub submit_label: &'static str,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub spec: FieldSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub required: bool,
}

impl SchemaView {
    pub fn from_schema(schema: &FormSchema) -> Self {
        let sections = schema
            .sections()
            .into_iter()
            .map(|(section, specs)| SectionView {
                title: section.title(),
                fields: specs
                    .into_iter()
                    .map(|spec| FieldView {
                        spec: *spec,
                        prompt: spec.prompt(),
                        required: true,
                    })
                    .collect(),
            })
            .collect();

        Self {
            sections,
            submit_label: SUBMIT_LABEL,
            disclaimer: DISCLAIMER,
        }
    }
}

pub(crate) async fn schema_handler() -> axum::Json<SchemaView> {
    axum::Json(SchemaView::from_schema(&FormSchema::standard()))
}

#[derive(Debug, Deserialize)]
pub struct FieldCheckRequest {
    #[serde(default)]
    pub value: RawValue,
}

#[derive(Debug, Serialize)]
pub struct FieldCheckResponse {
    pub field: SurveyField,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(crate) async fn validate_field_handler(
    Path(field): Path<String>,
    axum::Json(request): axum::Json<FieldCheckRequest>,
) -> Response {
    let field = match field.parse::<SurveyField>() {
        Ok(field) => field,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    let error = field
        .spec()
        .validate(&request.value)
        .err()
        .map(|error| error.to_string());

    let response = FieldCheckResponse {
        field,
        valid: error.is_none(),
        error,
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

/// One form session per request: record every answer, run a single
/// submission cycle, and report the resulting view.
pub(crate) async fn assessment_handler<G>(
    State(gateway): State<Arc<G>>,
    axum::Json(answers): axum::Json<BTreeMap<String, RawValue>>,
) -> Response
where
    G: PredictionGateway + 'static,
{
    let mut controller = SubmissionController::new(gateway);

    for (name, value) in answers {
        if let Err(error) = controller.edit_named(&name, value) {
            warn!(%error, "assessment rejected: unexpected answer key");
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    }

    let status = match controller.submit().await {
        SubmissionStatus::Succeeded { .. } => StatusCode::OK,
        SubmissionStatus::Failed { .. } => StatusCode::BAD_GATEWAY,
        SubmissionStatus::Idle => StatusCode::UNPROCESSABLE_ENTITY,
        // submit() always resolves the cycle it opens.
        SubmissionStatus::Submitting => {
            error!("submission cycle left unresolved");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, axum::Json(controller.state().view())).into_response()
}
