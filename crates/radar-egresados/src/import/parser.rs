use super::normalizer::normalize_label;
use crate::metrics::{
    CompetencyRecord, EmployerRecord, GraduateRecord, MetricsError, MonthlySnapshot,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// A CSV row shape that converts into a validated record.
pub(crate) trait SurveyRow: DeserializeOwned {
    type Record;

    fn into_record(self) -> Result<Self::Record, MetricsError>;
}

/// A row that failed validation, with its 1-based data row number.
#[derive(Debug)]
pub(crate) struct RowFailure {
    pub(crate) row: usize,
    pub(crate) error: MetricsError,
}

pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row(RowFailure),
}

pub(crate) fn parse_rows<R, T>(reader: R) -> Result<Vec<T::Record>, ParseFailure>
where
    R: Read,
    T: SurveyRow,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<T>().enumerate() {
        let row = row.map_err(ParseFailure::Csv)?;
        let record = row.into_record().map_err(|error| {
            ParseFailure::Row(RowFailure {
                row: index + 1,
                error,
            })
        })?;
        records.push(record);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompetencyRow {
    #[serde(rename = "competency")]
    name: String,
    #[serde(deserialize_with = "percent_cell")]
    declared: f64,
    #[serde(deserialize_with = "percent_cell")]
    observed: f64,
    #[serde(deserialize_with = "percent_cell")]
    target: f64,
}

impl SurveyRow for CompetencyRow {
    type Record = CompetencyRecord;

    fn into_record(self) -> Result<Self::Record, MetricsError> {
        CompetencyRecord::new(
            normalize_label(&self.name),
            self.declared,
            self.observed,
            self.target,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployerRow {
    #[serde(rename = "employer")]
    name: String,
    #[serde(deserialize_with = "percent_cell")]
    satisfaction: f64,
    #[serde(default)]
    interviews: u32,
}

impl SurveyRow for EmployerRow {
    type Record = EmployerRecord;

    fn into_record(self) -> Result<Self::Record, MetricsError> {
        EmployerRecord::new(normalize_label(&self.name), self.satisfaction, self.interviews)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotRow {
    month: String,
    #[serde(deserialize_with = "percent_cell")]
    employability: f64,
    #[serde(deserialize_with = "percent_cell")]
    satisfaction: f64,
}

impl SurveyRow for SnapshotRow {
    type Record = MonthlySnapshot;

    fn into_record(self) -> Result<Self::Record, MetricsError> {
        MonthlySnapshot::new(
            normalize_label(&self.month),
            self.employability,
            self.satisfaction,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraduateRow {
    id: u32,
    name: String,
    program: String,
    year: i32,
    #[serde(deserialize_with = "percent_cell")]
    employability_6m: f64,
}

impl SurveyRow for GraduateRow {
    type Record = GraduateRecord;

    fn into_record(self) -> Result<Self::Record, MetricsError> {
        GraduateRecord::new(
            self.id,
            normalize_label(&self.name),
            normalize_label(&self.program),
            self.year,
            self.employability_6m,
        )
    }
}

/// Accepts `82`, `82.5` and `82%`. Range checks happen when the record is
/// built so the failing column can be reported.
fn percent_cell<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_percent(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("'{raw}' is not a percentage value"))
    })
}

fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok()
}

#[cfg(test)]
pub(crate) fn parse_percent_for_tests(raw: &str) -> Option<f64> {
    parse_percent(raw)
}
