use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failures raised by the metrics engine and by record construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("{operation} requires at least one record")]
    EmptyInput { operation: &'static str },
    #[error("month '{current}' does not follow '{previous}' in the configured calendar")]
    UnorderedInput { previous: String, current: String },
    #[error("month '{label}' is not part of the configured calendar")]
    UnknownMonth { label: String },
    #[error("{field} must be within [0, 100], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// A score on the 0-100 scale shared by every survey instrument.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    pub fn new(value: f64) -> Result<Self, MetricsError> {
        Self::named("percentage", value)
    }

    /// Validates `value`, reporting `field` in the error so import failures
    /// point at the offending column.
    pub fn named(field: &'static str, value: f64) -> Result<Self, MetricsError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MetricsError::OutOfRange { field, value })
        }
    }

    /// Whole-number score, saturating at 100.
    pub fn from_score(score: u8) -> Self {
        Self(f64::from(score.min(100)))
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Share of the scale as a ratio in `[0, 1]`.
    pub fn ratio(self) -> f64 {
        self.0 / Self::MAX
    }
}

impl TryFrom<f64> for Percentage {
    type Error = MetricsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A tracked competency scored from the graduate's and the employer's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyRecord {
    pub name: String,
    pub declared: Percentage,
    pub observed: Percentage,
    pub target: Percentage,
}

impl CompetencyRecord {
    pub fn new(
        name: impl Into<String>,
        declared: f64,
        observed: f64,
        target: f64,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            name: name.into(),
            declared: Percentage::named("declared", declared)?,
            observed: Percentage::named("observed", observed)?,
            target: Percentage::named("target", target)?,
        })
    }
}

/// Signed perception mismatch for one competency. Positive values mean the
/// graduates rate themselves above what employers observe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    pub name: String,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerRecord {
    pub name: String,
    pub satisfaction_pct: Percentage,
    pub interview_count: u32,
}

impl EmployerRecord {
    pub fn new(
        name: impl Into<String>,
        satisfaction_pct: f64,
        interview_count: u32,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            name: name.into(),
            satisfaction_pct: Percentage::named("satisfaction", satisfaction_pct)?,
            interview_count,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    pub month: String,
    pub employability_pct: Percentage,
    pub satisfaction_pct: Percentage,
}

impl MonthlySnapshot {
    pub fn new(
        month: impl Into<String>,
        employability_pct: f64,
        satisfaction_pct: f64,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            month: month.into(),
            employability_pct: Percentage::named("employability", employability_pct)?,
            satisfaction_pct: Percentage::named("satisfaction", satisfaction_pct)?,
        })
    }
}

/// One row of the surveyed graduates table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraduateRecord {
    pub id: u32,
    pub name: String,
    pub program: String,
    pub cohort_year: i32,
    pub employability_6m: Percentage,
}

impl GraduateRecord {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        program: impl Into<String>,
        cohort_year: i32,
        employability_6m: f64,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            id,
            name: name.into(),
            program: program.into(),
            cohort_year,
            employability_6m: Percentage::named("employability_6m", employability_6m)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAppointment {
    pub employer: String,
    pub scheduled_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_accepts_bounds_and_rejects_outliers() {
        assert_eq!(Percentage::new(0.0).expect("lower bound").value(), 0.0);
        assert_eq!(Percentage::new(100.0).expect("upper bound").value(), 100.0);

        assert_eq!(
            Percentage::new(100.5),
            Err(MetricsError::OutOfRange {
                field: "percentage",
                value: 100.5
            })
        );
        assert!(Percentage::new(-1.0).is_err());
        assert!(Percentage::new(f64::NAN).is_err());
    }

    #[test]
    fn competency_reports_the_offending_field() {
        let error = CompetencyRecord::new("Inglés", 80.0, 120.0, 75.0).expect_err("out of range");
        assert_eq!(
            error,
            MetricsError::OutOfRange {
                field: "observed",
                value: 120.0
            }
        );
    }

    #[test]
    fn percentage_deserialization_validates_range() {
        let ok: Percentage = serde_json::from_str("42.5").expect("valid percentage");
        assert_eq!(ok.value(), 42.5);

        let err = serde_json::from_str::<Percentage>("140").expect_err("rejected");
        assert!(err.to_string().contains("within [0, 100]"));
    }
}
