use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::schema::SchemaError;

/// Identifier for each survey question; the wire name is the payload key the
/// prediction service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurveyField {
    HighBp,
    HighChol,
    CholCheck,
    Bmi,
    Smoker,
    Stroke,
    HeartDiseaseOrAttack,
    PhysActivity,
    Fruits,
    Veggies,
    HvyAlcoholConsump,
    AnyHealthcare,
    NoDocBcCost,
    GenHlth,
    MentHlth,
    PhysHlth,
    DiffWalk,
    Sex,
    Age,
    Education,
    Income,
}

impl SurveyField {
    /// Every field, in the feature order used by the prediction model.
    pub const ALL: [SurveyField; 21] = [
        SurveyField::HighBp,
        SurveyField::HighChol,
        SurveyField::CholCheck,
        SurveyField::Bmi,
        SurveyField::Smoker,
        SurveyField::Stroke,
        SurveyField::HeartDiseaseOrAttack,
        SurveyField::PhysActivity,
        SurveyField::Fruits,
        SurveyField::Veggies,
        SurveyField::HvyAlcoholConsump,
        SurveyField::AnyHealthcare,
        SurveyField::NoDocBcCost,
        SurveyField::GenHlth,
        SurveyField::MentHlth,
        SurveyField::PhysHlth,
        SurveyField::DiffWalk,
        SurveyField::Sex,
        SurveyField::Age,
        SurveyField::Education,
        SurveyField::Income,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SurveyField::HighBp => "HighBP",
            SurveyField::HighChol => "HighChol",
            SurveyField::CholCheck => "CholCheck",
            SurveyField::Bmi => "BMI",
            SurveyField::Smoker => "Smoker",
            SurveyField::Stroke => "Stroke",
            SurveyField::HeartDiseaseOrAttack => "HeartDiseaseorAttack",
            SurveyField::PhysActivity => "PhysActivity",
            SurveyField::Fruits => "Fruits",
            SurveyField::Veggies => "Veggies",
            SurveyField::HvyAlcoholConsump => "HvyAlcoholConsump",
            SurveyField::AnyHealthcare => "AnyHealthcare",
            SurveyField::NoDocBcCost => "NoDocbcCost",
            SurveyField::GenHlth => "GenHlth",
            SurveyField::MentHlth => "MentHlth",
            SurveyField::PhysHlth => "PhysHlth",
            SurveyField::DiffWalk => "DiffWalk",
            SurveyField::Sex => "Sex",
            SurveyField::Age => "Age",
            SurveyField::Education => "Education",
            SurveyField::Income => "Income",
        }
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurveyField {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        SurveyField::ALL
            .into_iter()
            .find(|field| field.name() == trimmed)
            .ok_or_else(|| SchemaError::UnknownField(trimmed.to_string()))
    }
}

impl Serialize for SurveyField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SurveyField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
