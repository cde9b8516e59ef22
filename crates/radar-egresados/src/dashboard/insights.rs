use super::views::{DashboardInsights, DashboardSummary, GapDirection};
use crate::metrics::PerceptionBand;

/// Gap magnitude, in points, worth calling out on its own.
const NOTABLE_GAP: f64 = 10.0;

pub(crate) fn generate_insights(summary: &DashboardSummary) -> DashboardInsights {
    let gauge = &summary.gauge;
    let mut observations = Vec::new();
    let mut recommended_actions = Vec::new();

    if gauge.target_met {
        observations.push(format!(
            "Employer perception at {}% meets the {}% target",
            gauge.value, gauge.target
        ));
    } else {
        observations.push(format!(
            "Employer perception at {}% is {} point{} below the {}% target",
            gauge.value,
            gauge.shortfall,
            if gauge.shortfall == 1 { "" } else { "s" },
            gauge.target
        ));
    }

    for entry in summary
        .critical_gaps
        .iter()
        .filter(|entry| entry.gap.abs() >= NOTABLE_GAP)
    {
        match entry.direction {
            GapDirection::Overestimated => observations.push(format!(
                "{}: graduates rate themselves {:.0} points above employers",
                entry.competency, entry.gap
            )),
            GapDirection::Underestimated => observations.push(format!(
                "{}: employers rate graduates {:.0} points above their self-assessment",
                entry.competency,
                entry.gap.abs()
            )),
            GapDirection::Aligned => {}
        }
    }

    if summary.average_gap >= NOTABLE_GAP {
        observations.push(format!(
            "Average gap of {:.0} points signals systematic overconfidence",
            summary.average_gap
        ));
    }

    if let Some(delta) = summary.trend_deltas.last() {
        if delta.employability_change < 0.0 {
            observations.push(format!(
                "Employability slipped {:.0} point{} from {} to {}",
                delta.employability_change.abs(),
                if delta.employability_change.abs() == 1.0 { "" } else { "s" },
                delta.from_month,
                delta.to_month
            ));
            recommended_actions.push(
                "Review placement pipeline with the career services office".to_string(),
            );
        }
    }

    let focus_competency = summary
        .critical_gaps
        .iter()
        .find(|entry| entry.direction == GapDirection::Overestimated)
        .map(|entry| entry.competency.clone());

    if let Some(name) = &focus_competency {
        let target = summary
            .radar
            .iter()
            .find(|radar| &radar.competency == name)
            .map(|radar| radar.target);
        match target {
            Some(target) => recommended_actions.push(format!(
                "Reinforce {name} in the curriculum toward the {target:.0}% target"
            )),
            None => recommended_actions.push(format!("Reinforce {name} in the curriculum")),
        }
    }

    let all_below_target = !summary.radar.is_empty()
        && summary
            .radar
            .iter()
            .all(|radar| radar.observed < radar.target);
    if all_below_target {
        recommended_actions.push(
            "No competency reaches its employer target; revisit the graduate profile".to_string(),
        );
    }

    let focus_employer = summary
        .employer_rollup
        .as_ref()
        .filter(|rollup| {
            summary.employers.iter().any(|employer| {
                employer.name == rollup.lowest_employer
                    && employer.satisfaction_pct < f64::from(gauge.target)
            })
        })
        .map(|rollup| rollup.lowest_employer.clone());

    if let Some(name) = &focus_employer {
        recommended_actions.push(format!(
            "Schedule a follow-up interview with {name} to understand low satisfaction"
        ));
    }

    for interview in &summary.upcoming_interviews {
        recommended_actions.push(format!(
            "Prepare the interview guide for {} on {}",
            interview.employer, interview.scheduled_on
        ));
    }

    if gauge.band == PerceptionBand::Critical {
        recommended_actions.push(
            "Escalate perception results to the curriculum committee this cycle".to_string(),
        );
    }

    DashboardInsights {
        perception_band: gauge.band,
        perception_label: gauge.band.label(),
        focus_competency,
        focus_employer,
        observations,
        recommended_actions,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DashboardConfig;
    use crate::dashboard::{DashboardDataset, DashboardReport};
    use crate::metrics::{CompetencyRecord, GraduateFilter, PerceptionBand};

    fn sample_insights() -> super::DashboardInsights {
        DashboardReport::build(
            &DashboardDataset::sample(),
            &DashboardConfig::default(),
            &GraduateFilter::default(),
            DashboardDataset::sample_as_of(),
        )
        .expect("report builds")
        .summary()
        .insights()
    }

    #[test]
    fn sample_insights_focus_on_largest_overestimate() {
        let insights = sample_insights();

        assert_eq!(insights.perception_band, PerceptionBand::Watch);
        assert_eq!(insights.focus_competency.as_deref(), Some("Comunicación"));
        assert_eq!(insights.focus_employer.as_deref(), Some("Zona Franca"));
        assert!(insights.observations[0].contains("8 points below the 75% target"));
        assert!(insights
            .observations
            .iter()
            .any(|line| line.contains("Employability slipped 1 point from Nov to Dic")));
        assert!(insights
            .recommended_actions
            .iter()
            .any(|line| line.contains("Reinforce Comunicación") && line.contains("85%")));
        assert!(insights
            .recommended_actions
            .iter()
            .any(|line| line.contains("EPM") && line.contains("2025-09-15")));
    }

    #[test]
    fn healthy_perception_reports_target_met() {
        let mut dataset = DashboardDataset::sample();
        dataset.competencies = vec![
            CompetencyRecord::new("Ética", 82.0, 80.0, 85.0).expect("valid"),
            CompetencyRecord::new("Inglés", 70.0, 78.0, 75.0).expect("valid"),
        ];
        dataset.employers.clear();

        let insights = DashboardReport::build(
            &dataset,
            &DashboardConfig::default(),
            &GraduateFilter::default(),
            DashboardDataset::sample_as_of(),
        )
        .expect("report builds")
        .summary()
        .insights();

        assert_eq!(insights.perception_band, PerceptionBand::Healthy);
        assert!(insights.observations[0].contains("meets the 75% target"));
        assert!(insights.focus_employer.is_none());
        assert_eq!(insights.focus_competency.as_deref(), Some("Ética"));
    }
}
