//! Diabetes risk questionnaire: field declarations, per-session form state,
//! submission to the prediction service, and risk classification.

pub mod batch;
pub mod controller;
pub mod field;
pub mod gateway;
pub mod risk;
pub mod router;
pub mod schema;
pub mod state;
pub mod value;

#[cfg(test)]
mod tests;

pub use batch::{
    read_answer_sheets, read_answer_sheets_from_path, AnswerSheet, BatchImportError,
};
pub use controller::SubmissionController;
pub use field::SurveyField;
pub use gateway::{
    decode_prediction, HttpPredictionClient, Prediction, PredictionError, PredictionGateway,
};
pub use risk::{classify, Assessment, AssessmentView, RiskTier, DISCLAIMER};
pub use router::{survey_router, FieldCheckRequest, FieldCheckResponse, SchemaView};
pub use schema::{
    EncodedAnswers, FieldKind, FieldOption, FieldSpec, FormSchema, FormSection, NumericBounds,
    SchemaError, ValidationError,
};
pub use state::{
    reduce, FormEvent, FormState, FormView, SubmissionStatus, Transition,
    PREDICTION_FAILURE_MESSAGE, SUBMITTING_LABEL, SUBMIT_LABEL,
};
pub use value::{EncodedValue, RawValue};
