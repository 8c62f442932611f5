use crate::infra::{load_answers_file, parse_answer, prediction_client};
use clap::Args;
use diabetes_survey::config::AppConfig;
use diabetes_survey::error::AppError;
use diabetes_survey::telemetry;
use diabetes_survey::survey::{
    read_answer_sheets_from_path, FieldKind, FormSchema, FormState, FormView, RawValue,
    SchemaView, SubmissionController, SubmissionStatus, SurveyField, DISCLAIMER,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SchemaArgs {
    /// Emit the questionnaire as JSON instead of a readable listing
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// JSON file containing an object of field name to answer
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Individual answer as Field=value; overrides the same field from --answers
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) overrides: Vec<(SurveyField, String)>,
    /// Emit the session view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export whose header row names the survey fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Emit one JSON line per row instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct BatchRowReport {
    row: usize,
    #[serde(flatten)]
    view: FormView,
}

pub(crate) fn run_schema(args: SchemaArgs) -> Result<(), AppError> {
    let schema = FormSchema::standard();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&SchemaView::from_schema(&schema))?);
        return Ok(());
    }

    println!("Diabetes risk survey ({} questions)", schema.fields().len());
    for (section, specs) in schema.sections() {
        println!("\n{}", section.title());
        for spec in specs {
            match spec.kind {
                FieldKind::Binary { options } | FieldKind::Categorical { options } => {
                    let choices: Vec<String> = options
                        .iter()
                        .map(|option| format!("{}={}", option.code, option.label))
                        .collect();
                    println!("- {} [{}]: {}", spec.label, spec.field, choices.join(", "));
                }
                FieldKind::Numeric { bounds, .. } => match bounds {
                    Some(bounds) => println!(
                        "- {} [{}]: number {}..={}",
                        spec.label, spec.field, bounds.min, bounds.max
                    ),
                    None => println!("- {} [{}]: number", spec.label, spec.field),
                },
            }
        }
    }
    println!("\n{DISCLAIMER}");

    Ok(())
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        overrides,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let mut collected = match answers {
        Some(path) => load_answers_file(&path)?,
        None => BTreeMap::new(),
    };
    for (field, value) in overrides {
        collected.insert(field.name().to_string(), RawValue::from(value));
    }

    let mut controller = SubmissionController::new(prediction_client(&config.prediction)?);
    for (name, value) in collected {
        controller.edit_named(&name, value)?;
    }
    controller.submit().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&controller.state().view())?
        );
    } else {
        render_session(controller.state());
    }

    session_outcome(controller.state())
}

pub(crate) async fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let sheets = read_answer_sheets_from_path(&args.input)?;
    let client = prediction_client(&config.prediction)?;

    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    for sheet in sheets {
        let mut controller = SubmissionController::new(client.clone());
        for (field, value) in sheet.values {
            controller.edit(field, value);
        }
        controller.submit().await;

        let state = controller.state();
        let bucket = match state.status() {
            SubmissionStatus::Succeeded { assessment } => assessment.label(),
            other => other.label(),
        };
        *tally.entry(bucket).or_default() += 1;

        if args.json {
            let report = BatchRowReport {
                row: sheet.row,
                view: state.view(),
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("Row {}: {}", sheet.row, session_summary(state));
        }
    }

    if !args.json {
        println!("\nTotals");
        for (bucket, count) in tally {
            println!("- {bucket}: {count}");
        }
    }

    Ok(())
}

/// Only a classified result counts as a completed assessment.
fn session_outcome(state: &FormState) -> Result<(), AppError> {
    match state.status() {
        SubmissionStatus::Succeeded { .. } => Ok(()),
        other => Err(AppError::Unassessed {
            status: other.label(),
        }),
    }
}

fn render_session(state: &FormState) {
    match state.status() {
        SubmissionStatus::Succeeded { assessment } => {
            println!("{}", assessment.label());
            println!("Probability: {}", assessment.percentage());
            println!("{}", assessment.summary());
            println!("\n{DISCLAIMER}");
        }
        SubmissionStatus::Failed { message } => println!("{message}"),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => {
            println!("{} answer(s) need attention:", state.errors().len());
            for (field, error) in state.errors() {
                println!("- {} [{}]: {}", field.label(), field, error);
            }
        }
    }
}

fn session_summary(state: &FormState) -> String {
    match state.status() {
        SubmissionStatus::Succeeded { assessment } => {
            format!("{} ({})", assessment.label(), assessment.percentage())
        }
        SubmissionStatus::Failed { message } => format!("failed: {message}"),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => {
            let fields: Vec<&str> = state.errors().keys().map(|field| field.name()).collect();
            format!(
                "{} invalid answer(s): {}",
                fields.len(),
                fields.join(", ")
            )
        }
    }
}
