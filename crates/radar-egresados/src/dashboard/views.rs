use crate::metrics::{EmployerRollup, PerceptionBand, TrendDelta};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    GraduatesSurveyed,
    EmployersInterviewed,
    EmployabilityRate,
    AverageGap,
}

impl KpiKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::GraduatesSurveyed,
            Self::EmployersInterviewed,
            Self::EmployabilityRate,
            Self::AverageGap,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GraduatesSurveyed => "Graduates surveyed",
            Self::EmployersInterviewed => "Employers interviewed",
            Self::EmployabilityRate => "Employability rate (6m)",
            Self::AverageGap => "Average gap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiUnit {
    Count,
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub kind: KpiKind,
    pub label: &'static str,
    pub value: f64,
    pub unit: KpiUnit,
    /// Latest month-over-month change in points, when a series backs the KPI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    Overestimated,
    Underestimated,
    Aligned,
}

impl GapDirection {
    pub fn from_gap(gap: f64) -> Self {
        if gap > 0.0 {
            Self::Overestimated
        } else if gap < 0.0 {
            Self::Underestimated
        } else {
            Self::Aligned
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overestimated => "Graduates above employers",
            Self::Underestimated => "Employers above graduates",
            Self::Aligned => "Aligned",
        }
    }
}

/// Absolute gap, in points, above which a gap is flagged as high severity.
pub const HIGH_GAP_SEVERITY: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    High,
    Moderate,
}

impl GapSeverity {
    pub fn from_gap(gap: f64) -> Self {
        if gap.abs() > HIGH_GAP_SEVERITY {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarEntry {
    pub competency: String,
    pub declared: f64,
    pub observed: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapEntry {
    pub competency: String,
    pub gap: f64,
    pub direction: GapDirection,
    pub direction_label: &'static str,
    pub severity: GapSeverity,
    pub severity_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerEntry {
    pub name: String,
    pub satisfaction_pct: f64,
    pub interview_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendEntry {
    pub month: String,
    pub employability_pct: f64,
    pub satisfaction_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub value: u8,
    pub target: u8,
    pub shortfall: u8,
    pub target_met: bool,
    pub band: PerceptionBand,
    pub band_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduateEntry {
    pub id: u32,
    pub name: String,
    pub program: String,
    pub cohort_year: i32,
    pub employability_6m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewEntry {
    pub employer: String,
    pub scheduled_on: NaiveDate,
}

/// Plain data handed to whatever renders the dashboard. Nothing here is tied
/// to a chart library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub kpis: Vec<KpiEntry>,
    pub global_perception: u8,
    pub weighted_perception: u8,
    pub gauge: GaugeView,
    pub radar: Vec<RadarEntry>,
    pub gaps: Vec<GapEntry>,
    pub critical_gaps: Vec<GapEntry>,
    pub average_gap: f64,
    pub employers: Vec<EmployerEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_rollup: Option<EmployerRollup>,
    pub trend: Vec<TrendEntry>,
    pub trend_deltas: Vec<TrendDelta>,
    pub graduates: Vec<GraduateEntry>,
    pub upcoming_interviews: Vec<InterviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInsights {
    pub perception_band: PerceptionBand,
    pub perception_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_competency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_employer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_severity_is_strictly_above_threshold() {
        assert_eq!(GapSeverity::from_gap(15.0), GapSeverity::Moderate);
        assert_eq!(GapSeverity::from_gap(-15.5), GapSeverity::High);
        assert_eq!(GapSeverity::from_gap(16.0).label(), "High");
    }
}
