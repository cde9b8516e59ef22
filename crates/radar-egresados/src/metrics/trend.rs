use super::domain::{MetricsError, MonthlySnapshot};
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Caller-declared canonical order of month labels used to validate trend
/// series. Labels compare case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthCalendar {
    labels: Vec<String>,
}

impl MonthCalendar {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Three-letter Spanish month abbreviations, January first.
    pub fn spanish() -> Self {
        Self::new(SPANISH_MONTHS)
    }

    /// Window of `window` months ending at `last`, wrapping across the year
    /// boundary (e.g. `Nov, Dic, Ene`).
    pub fn trailing(&self, last: &str, window: usize) -> Result<Self, MetricsError> {
        let len = self.labels.len();
        let end = self
            .position(last)
            .ok_or_else(|| MetricsError::UnknownMonth {
                label: last.trim().to_string(),
            })?;
        let window = window.min(len);
        let start = end + len + 1 - window;

        Ok(Self {
            labels: (0..window)
                .map(|offset| self.labels[(start + offset) % len].clone())
                .collect(),
        })
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        let wanted = label.trim().to_lowercase();
        self.labels
            .iter()
            .position(|candidate| candidate.to_lowercase() == wanted)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for MonthCalendar {
    fn default() -> Self {
        Self::spanish()
    }
}

/// Returns the snapshots unchanged once every label is known to `calendar`
/// and strictly advances through it. The series is never re-sorted.
pub fn build_trend_series(
    snapshots: &[MonthlySnapshot],
    calendar: &MonthCalendar,
) -> Result<Vec<MonthlySnapshot>, MetricsError> {
    let mut previous: Option<(usize, &str)> = None;

    for snapshot in snapshots {
        let position =
            calendar
                .position(&snapshot.month)
                .ok_or_else(|| MetricsError::UnknownMonth {
                    label: snapshot.month.clone(),
                })?;

        if let Some((previous_position, previous_label)) = previous {
            if position <= previous_position {
                return Err(MetricsError::UnorderedInput {
                    previous: previous_label.to_string(),
                    current: snapshot.month.clone(),
                });
            }
        }

        previous = Some((position, snapshot.month.as_str()));
    }

    Ok(snapshots.to_vec())
}

/// Month-over-month change between two consecutive snapshots, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDelta {
    pub from_month: String,
    pub to_month: String,
    pub employability_change: f64,
    pub satisfaction_change: f64,
}

pub fn compute_trend_deltas(snapshots: &[MonthlySnapshot]) -> Vec<TrendDelta> {
    snapshots
        .windows(2)
        .map(|pair| TrendDelta {
            from_month: pair[0].month.clone(),
            to_month: pair[1].month.clone(),
            employability_change: pair[1].employability_pct.value()
                - pair[0].employability_pct.value(),
            satisfaction_change: pair[1].satisfaction_pct.value()
                - pair[0].satisfaction_pct.value(),
        })
        .collect()
}
