//! CSV ingestion for survey exports. Every record is range-checked on the
//! way in so the metrics engine only ever sees valid percentages.

mod normalizer;
mod parser;

use crate::dashboard::DashboardDataset;
use crate::metrics::{
    CompetencyRecord, EmployerRecord, GraduateRecord, MetricsError, MonthlySnapshot,
};
use parser::{CompetencyRow, EmployerRow, GraduateRow, ParseFailure, SnapshotRow};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum SurveyImportError {
    #[error("failed to read survey export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid survey CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} of the survey export is invalid: {source}")]
    InvalidRow { row: usize, source: MetricsError },
    #[error("invalid dashboard dataset JSON: {0}")]
    Dataset(#[from] serde_json::Error),
}

impl From<ParseFailure> for SurveyImportError {
    fn from(value: ParseFailure) -> Self {
        match value {
            ParseFailure::Csv(err) => Self::Csv(err),
            ParseFailure::Row(failure) => Self::InvalidRow {
                row: failure.row,
                source: failure.error,
            },
        }
    }
}

/// Reads the four survey exports backing the dashboard.
///
/// | export       | columns                                      |
/// |--------------|----------------------------------------------|
/// | competencies | `competency,declared,observed,target`        |
/// | employers    | `employer,satisfaction,interviews`           |
/// | snapshots    | `month,employability,satisfaction`           |
/// | graduates    | `id,name,program,year,employability_6m`      |
pub struct SurveyImporter;

impl SurveyImporter {
    /// Competency rows keyed by name; a repeated name keeps its first row.
    pub fn competencies_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<CompetencyRecord>, SurveyImportError> {
        let records = parser::parse_rows::<_, CompetencyRow>(reader)?;
        Ok(dedupe_by_name(records, "competency", |record| record.name.as_str()))
    }

    pub fn competencies_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<CompetencyRecord>, SurveyImportError> {
        Self::competencies_from_reader(open(path)?)
    }

    /// Employer rows keyed by name; a repeated name keeps its first row.
    pub fn employers_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<EmployerRecord>, SurveyImportError> {
        let records = parser::parse_rows::<_, EmployerRow>(reader)?;
        Ok(dedupe_by_name(records, "employer", |record| record.name.as_str()))
    }

    pub fn employers_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<EmployerRecord>, SurveyImportError> {
        Self::employers_from_reader(open(path)?)
    }

    /// Monthly rows in file order. Ordering is validated later against the
    /// dataset calendar, never corrected here.
    pub fn snapshots_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<MonthlySnapshot>, SurveyImportError> {
        let records = parser::parse_rows::<_, SnapshotRow>(reader)?;
        debug!(count = records.len(), "imported monthly snapshots");
        Ok(records)
    }

    pub fn snapshots_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<MonthlySnapshot>, SurveyImportError> {
        Self::snapshots_from_reader(open(path)?)
    }

    pub fn graduates_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<GraduateRecord>, SurveyImportError> {
        let records = parser::parse_rows::<_, GraduateRow>(reader)?;
        debug!(count = records.len(), "imported graduates");
        Ok(records)
    }

    pub fn graduates_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<GraduateRecord>, SurveyImportError> {
        Self::graduates_from_reader(open(path)?)
    }
}

impl SurveyImporter {
    /// A complete dataset serialized as JSON. Percentages are range-checked
    /// while deserializing; omitted sections default to empty and the
    /// calendar to Spanish month abbreviations.
    pub fn dataset_from_reader<R: Read>(
        reader: R,
    ) -> Result<DashboardDataset, SurveyImportError> {
        let dataset: DashboardDataset = serde_json::from_reader(reader)?;
        debug!(
            competencies = dataset.competencies.len(),
            employers = dataset.employers.len(),
            "imported dashboard dataset"
        );
        Ok(dataset)
    }

    pub fn dataset_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<DashboardDataset, SurveyImportError> {
        Self::dataset_from_reader(open(path)?)
    }
}

fn open<P: AsRef<Path>>(path: P) -> Result<std::fs::File, SurveyImportError> {
    Ok(std::fs::File::open(path)?)
}

fn dedupe_by_name<T, F>(records: Vec<T>, kind: &'static str, name_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = HashSet::new();
    let total = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|record| {
            let name = name_of(record);
            let fresh = seen.insert(name.to_lowercase());
            if !fresh {
                warn!(kind, name, "duplicate row ignored");
            }
            fresh
        })
        .collect();

    debug!(kind, total, kept = kept.len(), "imported survey rows");
    kept
}
