use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Input as typed by the respondent, before any decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
}

impl RawValue {
    /// Whitespace-only input counts as empty.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Empty => None,
            RawValue::Text(text) => Some(text.trim()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::text(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::text(value)
    }
}

impl From<Option<String>> for RawValue {
    fn from(value: Option<String>) -> Self {
        value.map(RawValue::text).unwrap_or_default()
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawValue::Empty => serializer.serialize_none(),
            RawValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// JSON clients may send strings, numbers, or null; everything is kept as text
/// so the schema performs the single typed decode.
impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Null => Ok(RawValue::Empty),
            serde_json::Value::String(text) => Ok(RawValue::text(text)),
            serde_json::Value::Number(number) => Ok(RawValue::Text(number.to_string())),
            serde_json::Value::Bool(flag) => Ok(RawValue::Text(u8::from(flag).to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number, found {other}"
            ))),
        }
    }
}

/// Numeric form of a validated answer as transmitted to the prediction service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodedValue {
    /// Option code for binary and categorical questions.
    Code(u8),
    Number(f64),
}

impl EncodedValue {
    pub fn as_f64(self) -> f64 {
        match self {
            EncodedValue::Code(code) => f64::from(code),
            EncodedValue::Number(number) => number,
        }
    }
}

impl Serialize for EncodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EncodedValue::Code(code) => serializer.serialize_u8(*code),
            EncodedValue::Number(number) => serializer.serialize_f64(*number),
        }
    }
}
