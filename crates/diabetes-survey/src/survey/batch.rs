use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::field::SurveyField;
use super::value::RawValue;

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read answer sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer sheet CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("answer sheet has no survey columns")]
    NoSurveyColumns,
}

/// One respondent's raw answers as read from a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    /// 1-based data row number, excluding the header.
    pub row: usize,
    pub values: BTreeMap<SurveyField, RawValue>,
}

pub fn read_answer_sheets_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<AnswerSheet>, BatchImportError> {
    let file = std::fs::File::open(path)?;
    read_answer_sheets(file)
}

/// Read answer sheets whose header row names survey fields. Columns that are
/// not survey fields (labels such as `Diabetes_012`) are skipped; absent
/// fields are left empty for validation to report.
pub fn read_answer_sheets<R: Read>(reader: R) -> Result<Vec<AnswerSheet>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut columns: Vec<(usize, SurveyField)> = Vec::new();
    for (index, header) in csv_reader.headers()?.iter().enumerate() {
        match header.parse::<SurveyField>() {
            Ok(field) => {
                if columns.iter().any(|(_, existing)| *existing == field) {
                    return Err(BatchImportError::DuplicateColumn(header.to_string()));
                }
                columns.push((index, field));
            }
            Err(_) => debug!(column = header, "skipping non-survey column"),
        }
    }

    if columns.is_empty() {
        return Err(BatchImportError::NoSurveyColumns);
    }

    let mut sheets = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        let values = columns
            .iter()
            .map(|(index, field)| {
                let raw = record.get(*index).map(RawValue::from).unwrap_or_default();
                (*field, raw)
            })
            .collect();

        sheets.push(AnswerSheet {
            row: offset + 1,
            values,
        });
    }

    Ok(sheets)
}
