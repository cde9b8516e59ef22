use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use radar_egresados::config::DashboardConfig;
use radar_egresados::dashboard::DashboardDataset;
use radar_egresados::import::{SurveyImportError, SurveyImporter};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dashboard: Arc<DashboardConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DataSource {
    Sample,
    Imported,
}

impl DataSource {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Sample => "Sample dataset",
            Self::Imported => "Imported survey data",
        }
    }
}

/// Where each survey export comes from. Kinds left as `None` keep the
/// records of the base dataset.
#[derive(Debug, Default)]
pub(crate) struct DatasetSources<T> {
    pub(crate) competencies: Option<T>,
    pub(crate) employers: Option<T>,
    pub(crate) snapshots: Option<T>,
    pub(crate) graduates: Option<T>,
}

impl<T> DatasetSources<T> {
    fn is_empty(&self) -> bool {
        self.competencies.is_none()
            && self.employers.is_none()
            && self.snapshots.is_none()
            && self.graduates.is_none()
    }

    /// The dataset CSV exports are layered onto: a supplied one, otherwise
    /// the sample.
    fn base_dataset(&self, base: Option<DashboardDataset>) -> (DashboardDataset, DataSource) {
        match base {
            Some(dataset) => (dataset, DataSource::Imported),
            None if self.is_empty() => (DashboardDataset::sample(), DataSource::Sample),
            None => (DashboardDataset::sample(), DataSource::Imported),
        }
    }
}

impl DatasetSources<PathBuf> {
    pub(crate) fn load(
        self,
        base: Option<DashboardDataset>,
    ) -> Result<(DashboardDataset, DataSource), SurveyImportError> {
        let (mut dataset, source) = self.base_dataset(base);

        if let Some(path) = self.competencies {
            dataset.competencies = SurveyImporter::competencies_from_path(path)?;
        }
        if let Some(path) = self.employers {
            dataset.employers = SurveyImporter::employers_from_path(path)?;
        }
        if let Some(path) = self.snapshots {
            dataset.snapshots = SurveyImporter::snapshots_from_path(path)?;
        }
        if let Some(path) = self.graduates {
            dataset.graduates = SurveyImporter::graduates_from_path(path)?;
        }

        Ok((dataset, source))
    }
}

impl DatasetSources<String> {
    pub(crate) fn load(
        self,
        base: Option<DashboardDataset>,
    ) -> Result<(DashboardDataset, DataSource), SurveyImportError> {
        let (mut dataset, source) = self.base_dataset(base);

        if let Some(csv) = self.competencies {
            dataset.competencies = SurveyImporter::competencies_from_reader(inline(csv))?;
        }
        if let Some(csv) = self.employers {
            dataset.employers = SurveyImporter::employers_from_reader(inline(csv))?;
        }
        if let Some(csv) = self.snapshots {
            dataset.snapshots = SurveyImporter::snapshots_from_reader(inline(csv))?;
        }
        if let Some(csv) = self.graduates {
            dataset.graduates = SurveyImporter::graduates_from_reader(inline(csv))?;
        }

        Ok((dataset, source))
    }
}

fn inline(csv: String) -> Cursor<Vec<u8>> {
    Cursor::new(csv.into_bytes())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
