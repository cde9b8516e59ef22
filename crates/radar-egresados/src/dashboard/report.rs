use super::dataset::DashboardDataset;
use super::views::{
    DashboardInsights, DashboardSummary, EmployerEntry, GapDirection, GapEntry, GapSeverity,
    GaugeView, GraduateEntry, InterviewEntry, KpiEntry, KpiKind, KpiUnit, RadarEntry, TrendEntry,
};
use crate::config::DashboardConfig;
use crate::metrics::{
    build_employer_view, build_trend_series, compute_average_gap, compute_employability_rate,
    compute_employer_rollup, compute_gaps, compute_global_perception, compute_trend_deltas,
    compute_weighted_perception, perception_gauge, rank_critical_gaps, upcoming_interviews,
    CompetencyRecord, EmployerRecord, EmployerRollup, GapRecord, GraduateFilter, GraduateRecord,
    InterviewAppointment, MetricsError, MonthlySnapshot, Percentage, PerceptionGauge, TrendDelta,
};
use chrono::NaiveDate;
use tracing::debug;

/// Every derived figure for one dashboard evaluation. Built once from a
/// dataset and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub as_of: NaiveDate,
    pub competencies: Vec<CompetencyRecord>,
    pub gaps: Vec<GapRecord>,
    pub critical_gaps: Vec<GapRecord>,
    pub average_gap: f64,
    pub global_perception: u8,
    pub weighted_perception: u8,
    pub gauge: PerceptionGauge,
    pub employers: Vec<EmployerRecord>,
    pub employer_rollup: Option<EmployerRollup>,
    pub trend: Vec<MonthlySnapshot>,
    pub trend_deltas: Vec<TrendDelta>,
    pub graduates: Vec<GraduateRecord>,
    pub employability_rate: Option<u8>,
    pub upcoming_interviews: Vec<InterviewAppointment>,
}

impl DashboardReport {
    /// Competencies are required: without them there is no perception index.
    /// Employers and graduates may be empty, in which case their rollups are
    /// left out.
    pub fn build(
        dataset: &DashboardDataset,
        settings: &DashboardConfig,
        filter: &GraduateFilter,
        as_of: NaiveDate,
    ) -> Result<Self, MetricsError> {
        let gaps = compute_gaps(&dataset.competencies);
        let global_perception = compute_global_perception(&dataset.competencies)?;
        let average_gap = compute_average_gap(&gaps)?;
        let critical_gaps = rank_critical_gaps(&gaps, settings.critical_gap_limit);
        let weighted_perception = compute_weighted_perception(
            &dataset.competencies,
            Percentage::from_score(settings.employer_weight),
        )?;
        let gauge = perception_gauge(global_perception, settings.perception_target);

        let employers = build_employer_view(&dataset.employers);
        let employer_rollup = if employers.is_empty() {
            None
        } else {
            Some(compute_employer_rollup(&employers)?)
        };

        let trend = build_trend_series(&dataset.snapshots, &dataset.calendar)?;
        let trend_deltas = compute_trend_deltas(&trend);

        let graduates = filter.apply(&dataset.graduates);
        let employability_rate = if graduates.is_empty() {
            None
        } else {
            Some(compute_employability_rate(&graduates)?)
        };

        let upcoming = upcoming_interviews(&dataset.interviews, as_of, settings.upcoming_interviews);

        debug!(
            %as_of,
            competencies = dataset.competencies.len(),
            employers = employers.len(),
            graduates = graduates.len(),
            global_perception,
            "dashboard report computed"
        );

        Ok(Self {
            as_of,
            competencies: dataset.competencies.clone(),
            gaps,
            critical_gaps,
            average_gap,
            global_perception,
            weighted_perception,
            gauge,
            employers,
            employer_rollup,
            trend,
            trend_deltas,
            graduates,
            employability_rate,
            upcoming_interviews: upcoming,
        })
    }

    pub fn summary(&self) -> DashboardSummary {
        let kpis = KpiKind::ordered()
            .into_iter()
            .filter_map(|kind| self.kpi(kind))
            .collect();

        let radar = self
            .competencies
            .iter()
            .map(|record| RadarEntry {
                competency: record.name.clone(),
                declared: record.declared.value(),
                observed: record.observed.value(),
                target: record.target.value(),
            })
            .collect();

        let employers = self
            .employers
            .iter()
            .map(|employer| EmployerEntry {
                name: employer.name.clone(),
                satisfaction_pct: employer.satisfaction_pct.value(),
                interview_count: employer.interview_count,
            })
            .collect();

        let trend = self
            .trend
            .iter()
            .map(|snapshot| TrendEntry {
                month: snapshot.month.clone(),
                employability_pct: snapshot.employability_pct.value(),
                satisfaction_pct: snapshot.satisfaction_pct.value(),
            })
            .collect();

        let graduates = self
            .graduates
            .iter()
            .map(|graduate| GraduateEntry {
                id: graduate.id,
                name: graduate.name.clone(),
                program: graduate.program.clone(),
                cohort_year: graduate.cohort_year,
                employability_6m: graduate.employability_6m.value(),
            })
            .collect();

        let upcoming_interviews = self
            .upcoming_interviews
            .iter()
            .map(|appointment| InterviewEntry {
                employer: appointment.employer.clone(),
                scheduled_on: appointment.scheduled_on,
            })
            .collect();

        DashboardSummary {
            as_of: self.as_of,
            kpis,
            global_perception: self.global_perception,
            weighted_perception: self.weighted_perception,
            gauge: gauge_view(&self.gauge),
            radar,
            gaps: self.gaps.iter().map(gap_entry).collect(),
            critical_gaps: self.critical_gaps.iter().map(gap_entry).collect(),
            average_gap: self.average_gap,
            employers,
            employer_rollup: self.employer_rollup.clone(),
            trend,
            trend_deltas: self.trend_deltas.clone(),
            graduates,
            upcoming_interviews,
        }
    }

    fn kpi(&self, kind: KpiKind) -> Option<KpiEntry> {
        let (value, unit, trend) = match kind {
            KpiKind::GraduatesSurveyed => (self.graduates.len() as f64, KpiUnit::Count, None),
            KpiKind::EmployersInterviewed => {
                let interviews: u64 = self
                    .employers
                    .iter()
                    .map(|employer| u64::from(employer.interview_count))
                    .sum();
                (interviews as f64, KpiUnit::Count, None)
            }
            KpiKind::EmployabilityRate => {
                let rate = self.employability_rate?;
                let trend = self
                    .trend_deltas
                    .last()
                    .map(|delta| delta.employability_change);
                (f64::from(rate), KpiUnit::Percent, trend)
            }
            KpiKind::AverageGap => (round_half_up(self.average_gap), KpiUnit::Percent, None),
        };

        Some(KpiEntry {
            kind,
            label: kind.label(),
            value,
            unit,
            trend,
        })
    }
}

impl DashboardSummary {
    pub fn insights(&self) -> DashboardInsights {
        super::generate_insights(self)
    }
}

/// Halves round toward positive infinity, so -2.5 displays as -2.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn gap_entry(record: &GapRecord) -> GapEntry {
    let direction = GapDirection::from_gap(record.gap);
    let severity = GapSeverity::from_gap(record.gap);
    GapEntry {
        competency: record.name.clone(),
        gap: record.gap,
        direction,
        direction_label: direction.label(),
        severity,
        severity_label: severity.label(),
    }
}

fn gauge_view(gauge: &PerceptionGauge) -> GaugeView {
    GaugeView {
        value: gauge.value,
        target: gauge.target,
        shortfall: gauge.shortfall,
        target_met: gauge.target_met,
        band: gauge.band,
        band_label: gauge.band.label(),
    }
}
