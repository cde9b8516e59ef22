use super::domain::{GraduateRecord, MetricsError};
use super::engine::{mean, round_to_scale};
use serde::{Deserialize, Serialize};

/// Cohort and program selection applied before graduate metrics are computed.
/// `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduateFilter {
    #[serde(default)]
    pub cohort_year: Option<i32>,
    #[serde(default)]
    pub program: Option<String>,
}

impl GraduateFilter {
    pub fn matches(&self, graduate: &GraduateRecord) -> bool {
        let year_matches = self
            .cohort_year
            .map_or(true, |year| graduate.cohort_year == year);
        let program_matches = self
            .program
            .as_deref()
            .map_or(true, |program| {
                graduate.program.trim().to_lowercase() == program.trim().to_lowercase()
            });

        year_matches && program_matches
    }

    pub fn apply(&self, graduates: &[GraduateRecord]) -> Vec<GraduateRecord> {
        graduates
            .iter()
            .filter(|graduate| self.matches(graduate))
            .cloned()
            .collect()
    }
}

/// Rounded six-month employability rate across the given graduates.
pub fn compute_employability_rate(graduates: &[GraduateRecord]) -> Result<u8, MetricsError> {
    let mean = mean(
        graduates.iter().map(|record| record.employability_6m.value()),
        "employability rate",
    )?;
    Ok(round_to_scale(mean))
}
