use super::domain::{CompetencyRecord, GapRecord, MetricsError, Percentage};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Below this index the perception gauge is shown as critical regardless of
/// the configured target.
pub const CRITICAL_PERCEPTION_FLOOR: u8 = 50;

pub fn compute_gaps(competencies: &[CompetencyRecord]) -> Vec<GapRecord> {
    competencies
        .iter()
        .map(|record| GapRecord {
            name: record.name.clone(),
            gap: record.declared.value() - record.observed.value(),
        })
        .collect()
}

/// Rounded mean of the employer-observed scores.
pub fn compute_global_perception(competencies: &[CompetencyRecord]) -> Result<u8, MetricsError> {
    let mean = mean(
        competencies.iter().map(|record| record.observed.value()),
        "global perception",
    )?;
    Ok(round_to_scale(mean))
}

/// Orders gaps by descending magnitude, keeping input order on ties, and
/// keeps at most `limit` entries.
pub fn rank_critical_gaps(gaps: &[GapRecord], limit: NonZeroUsize) -> Vec<GapRecord> {
    let mut ranked = gaps.to_vec();
    ranked.sort_by(|a, b| b.gap.abs().total_cmp(&a.gap.abs()));
    ranked.truncate(limit.get());
    ranked
}

pub fn compute_average_gap(gaps: &[GapRecord]) -> Result<f64, MetricsError> {
    mean(gaps.iter().map(|record| record.gap), "average gap")
}

/// Perception index blending both viewpoints: `employer_weight` of the
/// observed score plus the remainder of the declared score.
pub fn compute_weighted_perception(
    competencies: &[CompetencyRecord],
    employer_weight: Percentage,
) -> Result<u8, MetricsError> {
    let weight = employer_weight.ratio();
    let mean = mean(
        competencies.iter().map(|record| {
            weight * record.observed.value() + (1.0 - weight) * record.declared.value()
        }),
        "weighted perception",
    )?;
    Ok(round_to_scale(mean))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerceptionBand {
    Critical,
    Watch,
    Healthy,
}

impl PerceptionBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Watch => "Watch",
            Self::Healthy => "Healthy",
        }
    }
}

/// Thermometer reading of the global perception index against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionGauge {
    pub value: u8,
    pub target: u8,
    pub shortfall: u8,
    pub target_met: bool,
    pub band: PerceptionBand,
}

pub fn perception_gauge(value: u8, target: u8) -> PerceptionGauge {
    let target_met = value >= target;
    let band = if value < CRITICAL_PERCEPTION_FLOOR {
        PerceptionBand::Critical
    } else if !target_met {
        PerceptionBand::Watch
    } else {
        PerceptionBand::Healthy
    };

    PerceptionGauge {
        value,
        target,
        shortfall: target.saturating_sub(value),
        target_met,
        band,
    }
}

pub(crate) fn mean<I>(values: I, operation: &'static str) -> Result<f64, MetricsError>
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });

    if count == 0 {
        return Err(MetricsError::EmptyInput { operation });
    }

    Ok(sum / count as f64)
}

pub(crate) fn round_to_scale(value: f64) -> u8 {
    value.round().clamp(Percentage::MIN, Percentage::MAX) as u8
}
