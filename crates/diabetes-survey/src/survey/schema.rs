use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::field::SurveyField;
use super::value::{EncodedValue, RawValue};

/// Programming defects in how the schema is addressed. These never reach the
/// respondent as field messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown survey field '{0}'")]
    UnknownField(String),
    #[error("value for {field} was encoded without passing validation")]
    UnvalidatedValue { field: SurveyField },
}

/// Field-level message shown inline next to the offending question.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{label} is required.")]
    Required {
        field: SurveyField,
        label: &'static str,
    },
    #[error("Select a valid option for {label}.")]
    InvalidOption {
        field: SurveyField,
        label: &'static str,
        value: String,
    },
    #[error("{message}")]
    OutOfRange {
        field: SurveyField,
        value: f64,
        message: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> SurveyField {
        match self {
            ValidationError::Required { field, .. }
            | ValidationError::InvalidOption { field, .. }
            | ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Grouping used when rendering the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    HealthIndicators,
    HealthcareAccess,
    PhysicalAndMentalHealth,
    GeneralHealthAndSocioeconomic,
}

impl FormSection {
    pub const ALL: [FormSection; 4] = [
        FormSection::HealthIndicators,
        FormSection::HealthcareAccess,
        FormSection::PhysicalAndMentalHealth,
        FormSection::GeneralHealthAndSocioeconomic,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            FormSection::HealthIndicators => "Health Indicators",
            FormSection::HealthcareAccess => "Healthcare Access",
            FormSection::PhysicalAndMentalHealth => "Physical & Mental Health",
            FormSection::GeneralHealthAndSocioeconomic => "General Health & Socioeconomic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub code: u8,
    pub label: &'static str,
}

/// Inclusive numeric range with the messages shown on either side of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    pub below_message: &'static str,
    pub above_message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Binary {
        options: &'static [FieldOption],
    },
    Categorical {
        options: &'static [FieldOption],
    },
    Numeric {
        placeholder: &'static str,
        bounds: Option<NumericBounds>,
    },
}

/// Declaration of one survey question. Every question is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub field: SurveyField,
    pub label: &'static str,
    pub section: FormSection,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn options(&self) -> &'static [FieldOption] {
        match self.kind {
            FieldKind::Binary { options } | FieldKind::Categorical { options } => options,
            FieldKind::Numeric { .. } => &[],
        }
    }

    /// Hint text for inputs that have one (numeric boxes and drop-downs).
    pub fn prompt(&self) -> Option<String> {
        match self.kind {
            FieldKind::Numeric { placeholder, .. } => Some(placeholder.to_string()),
            FieldKind::Categorical { .. } => Some(format!("Select {}", self.label.to_lowercase())),
            FieldKind::Binary { .. } => None,
        }
    }

    pub fn validate(&self, raw: &RawValue) -> Result<EncodedValue, ValidationError> {
        let required = || ValidationError::Required {
            field: self.field,
            label: self.label,
        };
        let text = raw.as_text().ok_or_else(required)?;

        match self.kind {
            FieldKind::Binary { options } | FieldKind::Categorical { options } => text
                .parse::<f64>()
                .ok()
                .and_then(|number| {
                    options
                        .iter()
                        .find(|option| f64::from(option.code) == number)
                })
                .map(|option| EncodedValue::Code(option.code))
                .ok_or_else(|| ValidationError::InvalidOption {
                    field: self.field,
                    label: self.label,
                    value: text.to_string(),
                }),
            FieldKind::Numeric { bounds, .. } => {
                let number = text
                    .parse::<f64>()
                    .ok()
                    .filter(|number| number.is_finite())
                    .ok_or_else(required)?;

                if let Some(bounds) = bounds {
                    let message = if number < bounds.min {
                        Some(bounds.below_message)
                    } else if number > bounds.max {
                        Some(bounds.above_message)
                    } else {
                        None
                    };
                    if let Some(message) = message {
                        return Err(ValidationError::OutOfRange {
                            field: self.field,
                            value: number,
                            message,
                        });
                    }
                }

                Ok(EncodedValue::Number(number))
            }
        }
    }

    /// Numeric form of a raw answer; only defined for answers `validate` accepts.
    pub fn encode(&self, raw: &RawValue) -> Result<f64, SchemaError> {
        self.validate(raw)
            .map(EncodedValue::as_f64)
            .map_err(|_| SchemaError::UnvalidatedValue { field: self.field })
    }
}

const YES_NO: &[FieldOption] = &[
    FieldOption {
        code: 1,
        label: "Yes",
    },
    FieldOption { code: 0, label: "No" },
];

const SEX: &[FieldOption] = &[
    FieldOption {
        code: 1,
        label: "Male",
    },
    FieldOption {
        code: 0,
        label: "Female",
    },
];

const GENERAL_HEALTH: &[FieldOption] = &[
    FieldOption {
        code: 1,
        label: "Excellent",
    },
    FieldOption {
        code: 2,
        label: "Very Good",
    },
    FieldOption {
        code: 3,
        label: "Good",
    },
    FieldOption {
        code: 4,
        label: "Fair",
    },
    FieldOption {
        code: 5,
        label: "Poor",
    },
];

const EDUCATION: &[FieldOption] = &[
    FieldOption {
        code: 1,
        label: "No School",
    },
    FieldOption {
        code: 2,
        label: "Grades 1-8",
    },
    FieldOption {
        code: 3,
        label: "Grades 9-11",
    },
    FieldOption {
        code: 4,
        label: "Grade 12/GED",
    },
    FieldOption {
        code: 5,
        label: "College 1-3 yrs",
    },
    FieldOption {
        code: 6,
        label: "College 4+ yrs",
    },
];

const INCOME: &[FieldOption] = &[
    FieldOption {
        code: 1,
        label: "< $10,000",
    },
    FieldOption {
        code: 2,
        label: "$10k - $15k",
    },
    FieldOption {
        code: 3,
        label: "$15k - $20k",
    },
    FieldOption {
        code: 4,
        label: "$20k - $25k",
    },
    FieldOption {
        code: 5,
        label: "$25k - $35k",
    },
    FieldOption {
        code: 6,
        label: "$35k - $50k",
    },
    FieldOption {
        code: 7,
        label: "$50k - $75k",
    },
    FieldOption {
        code: 8,
        label: "> $75,000",
    },
];

const POOR_DAYS: NumericBounds = NumericBounds {
    min: 0.0,
    max: 30.0,
    below_message: "Must be between 0 and 30.",
    above_message: "Must be between 0 and 30.",
};

const AGE_RANGE: NumericBounds = NumericBounds {
    min: 1.0,
    max: 130.0,
    below_message: "Age must be positive.",
    above_message: "Age seems too high.",
};

const fn binary(field: SurveyField, label: &'static str, section: FormSection) -> FieldSpec {
    FieldSpec {
        field,
        label,
        section,
        kind: FieldKind::Binary { options: YES_NO },
    }
}

// Indexed by `SurveyField` discriminant; order must match `SurveyField::ALL`.
static FIELD_SPECS: [FieldSpec; 21] = [
    binary(
        SurveyField::HighBp,
        "High Blood Pressure",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::HighChol,
        "High Cholesterol",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::CholCheck,
        "Cholesterol Check in 5 Yrs",
        FormSection::HealthIndicators,
    ),
    FieldSpec {
        field: SurveyField::Bmi,
        label: "BMI",
        section: FormSection::PhysicalAndMentalHealth,
        kind: FieldKind::Numeric {
            placeholder: "Enter your BMI",
            bounds: None,
        },
    },
    binary(SurveyField::Smoker, "Smoker", FormSection::HealthIndicators),
    binary(
        SurveyField::Stroke,
        "History of Stroke",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::HeartDiseaseOrAttack,
        "Heart Disease or Attack",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::PhysActivity,
        "Physical Activity",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::Fruits,
        "Consume Fruit Daily",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::Veggies,
        "Consume Veggies Daily",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::HvyAlcoholConsump,
        "Heavy Alcohol Consumption",
        FormSection::HealthIndicators,
    ),
    binary(
        SurveyField::AnyHealthcare,
        "Have Any Healthcare Coverage",
        FormSection::HealthcareAccess,
    ),
    binary(
        SurveyField::NoDocBcCost,
        "Could Not See Doctor Due to Cost",
        FormSection::HealthcareAccess,
    ),
    FieldSpec {
        field: SurveyField::GenHlth,
        label: "General Health",
        section: FormSection::GeneralHealthAndSocioeconomic,
        kind: FieldKind::Categorical {
            options: GENERAL_HEALTH,
        },
    },
    FieldSpec {
        field: SurveyField::MentHlth,
        label: "Mental Health (poor days in past 30)",
        section: FormSection::PhysicalAndMentalHealth,
        kind: FieldKind::Numeric {
            placeholder: "0-30 days",
            bounds: Some(POOR_DAYS),
        },
    },
    FieldSpec {
        field: SurveyField::PhysHlth,
        label: "Physical Health (poor days in past 30)",
        section: FormSection::PhysicalAndMentalHealth,
        kind: FieldKind::Numeric {
            placeholder: "0-30 days",
            bounds: Some(POOR_DAYS),
        },
    },
    binary(
        SurveyField::DiffWalk,
        "Difficulty Walking",
        FormSection::HealthIndicators,
    ),
    FieldSpec {
        field: SurveyField::Sex,
        label: "Sex",
        section: FormSection::HealthIndicators,
        kind: FieldKind::Binary { options: SEX },
    },
    FieldSpec {
        field: SurveyField::Age,
        label: "Age",
        section: FormSection::GeneralHealthAndSocioeconomic,
        kind: FieldKind::Numeric {
            placeholder: "Enter your age",
            bounds: Some(AGE_RANGE),
        },
    },
    FieldSpec {
        field: SurveyField::Education,
        label: "Education Level",
        section: FormSection::GeneralHealthAndSocioeconomic,
        kind: FieldKind::Categorical { options: EDUCATION },
    },
    FieldSpec {
        field: SurveyField::Income,
        label: "Income Level",
        section: FormSection::GeneralHealthAndSocioeconomic,
        kind: FieldKind::Categorical { options: INCOME },
    },
];

impl SurveyField {
    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }
}

/// The fixed questionnaire. Field declarations are static; the schema only
/// provides lookups and whole-form validation over them.
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    fields: &'static [FieldSpec],
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::standard()
    }
}

impl FormSchema {
    pub const fn standard() -> Self {
        Self {
            fields: &FIELD_SPECS,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn lookup(&self, name: &str) -> Result<&'static FieldSpec, SchemaError> {
        name.parse::<SurveyField>().map(SurveyField::spec)
    }

    pub fn validate(
        &self,
        field: SurveyField,
        raw: &RawValue,
    ) -> Result<EncodedValue, ValidationError> {
        field.spec().validate(raw)
    }

    pub fn encode(&self, field: SurveyField, raw: &RawValue) -> Result<f64, SchemaError> {
        field.spec().encode(raw)
    }

    /// Questions grouped by section, in display order.
    pub fn sections(&self) -> Vec<(FormSection, Vec<&'static FieldSpec>)> {
        FormSection::ALL
            .into_iter()
            .map(|section| {
                let fields = self
                    .fields
                    .iter()
                    .filter(|spec| spec.section == section)
                    .collect();
                (section, fields)
            })
            .collect()
    }

    /// Validate every field at once. Missing entries count as empty answers.
    pub fn validate_all(
        &self,
        values: &BTreeMap<SurveyField, RawValue>,
    ) -> Result<EncodedAnswers, BTreeMap<SurveyField, ValidationError>> {
        let empty = RawValue::Empty;
        let mut encoded = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for spec in self.fields {
            let raw = values.get(&spec.field).unwrap_or(&empty);
            match spec.validate(raw) {
                Ok(value) => {
                    encoded.insert(spec.field, value);
                }
                Err(error) => {
                    errors.insert(spec.field, error);
                }
            }
        }

        if errors.is_empty() {
            Ok(EncodedAnswers { values: encoded })
        } else {
            Err(errors)
        }
    }
}

/// A complete, validated answer set. Only `FormSchema::validate_all` builds one,
/// so it always carries exactly one value per survey field.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAnswers {
    values: BTreeMap<SurveyField, EncodedValue>,
}

impl EncodedAnswers {
    pub fn get(&self, field: SurveyField) -> Option<EncodedValue> {
        self.values.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurveyField, EncodedValue)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }
}

impl Serialize for EncodedAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}
