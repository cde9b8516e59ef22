use chrono::NaiveDate;
use radar_egresados::config::DashboardConfig;
use radar_egresados::dashboard::views::{GapDirection, KpiKind};
use radar_egresados::dashboard::{DashboardDataset, DashboardReport};
use radar_egresados::import::SurveyImporter;
use radar_egresados::metrics::{
    compute_average_gap, compute_gaps, compute_global_perception, rank_critical_gaps,
    CompetencyRecord, GraduateFilter, MetricsError, MonthCalendar,
};
use std::num::NonZeroUsize;

fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid evaluation date")
}

#[test]
fn two_competency_scenario_matches_expected_figures() {
    let competencies = vec![
        CompetencyRecord::new("Comunicación", 80.0, 60.0, 75.0).expect("valid record"),
        CompetencyRecord::new("Tecnología", 50.0, 70.0, 80.0).expect("valid record"),
    ];

    let gaps = compute_gaps(&competencies);
    assert_eq!(gaps[0].gap, 20.0);
    assert_eq!(gaps[1].gap, -20.0);
    assert_eq!(compute_global_perception(&competencies), Ok(65));
    assert_eq!(compute_average_gap(&gaps), Ok(0.0));

    let limit = NonZeroUsize::new(1).expect("non-zero limit");
    let ranked = rank_critical_gaps(&gaps, limit);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "Comunicación");
}

#[test]
fn imported_exports_drive_the_dashboard() {
    let competencies = "competency,declared,observed,target\n\
Comunicación,82%,64%,85%\n\
Inglés,63,47,80\n\
Ética,91,83,85\n";
    let employers = "employer,satisfaction,interviews\n\
EPM,88,5\n\
Nutresa,61,2\n";
    let snapshots = "month,employability,satisfaction\n\
Nov,74,76\n\
Dic,77,79\n\
Ene,75,80\n";

    let mut dataset = DashboardDataset::sample();
    dataset.competencies =
        SurveyImporter::competencies_from_reader(competencies.as_bytes()).expect("competencies");
    dataset.employers =
        SurveyImporter::employers_from_reader(employers.as_bytes()).expect("employers");
    dataset.snapshots =
        SurveyImporter::snapshots_from_reader(snapshots.as_bytes()).expect("snapshots");
    dataset.calendar = MonthCalendar::spanish()
        .trailing("Ene", 3)
        .expect("known month");

    let report = DashboardReport::build(
        &dataset,
        &DashboardConfig::default(),
        &GraduateFilter::default(),
        evaluation_date(),
    )
    .expect("report builds");

    // observed 64 + 47 + 83 = 194 over 3
    assert_eq!(report.global_perception, 65);
    assert_eq!(report.trend.len(), 3);
    assert_eq!(report.trend_deltas[1].from_month, "Dic");
    assert_eq!(report.trend_deltas[1].to_month, "Ene");
    assert_eq!(report.trend_deltas[1].employability_change, -2.0);

    let rollup = report.employer_rollup.as_ref().expect("employers present");
    assert_eq!(rollup.total_interviews, 7);
    assert_eq!(rollup.top_employer, "EPM");
    assert_eq!(rollup.lowest_employer, "Nutresa");

    let summary = report.summary();
    assert_eq!(summary.critical_gaps[0].competency, "Comunicación");
    assert_eq!(summary.critical_gaps[1].competency, "Inglés");
    assert_eq!(summary.critical_gaps[0].direction, GapDirection::Overestimated);

    let insights = summary.insights();
    assert_eq!(insights.focus_employer.as_deref(), Some("Nutresa"));
}

#[test]
fn year_boundary_trend_fails_without_wrapping_calendar() {
    let mut dataset = DashboardDataset::sample();
    dataset.snapshots = SurveyImporter::snapshots_from_reader(
        "month,employability,satisfaction\nDic,77,79\nEne,75,80\n".as_bytes(),
    )
    .expect("snapshots");

    let error = DashboardReport::build(
        &dataset,
        &DashboardConfig::default(),
        &GraduateFilter::default(),
        evaluation_date(),
    )
    .expect_err("calendar order enforced");

    assert!(matches!(error, MetricsError::UnorderedInput { .. }));
}

#[test]
fn settings_shape_the_summary() {
    let settings = DashboardConfig {
        perception_target: 60,
        critical_gap_limit: NonZeroUsize::new(2).expect("non-zero limit"),
        upcoming_interviews: 1,
        employer_weight: 100,
    };
    let filter = GraduateFilter {
        cohort_year: None,
        program: Some("ingeniería de sistemas".to_string()),
    };

    let report = DashboardReport::build(
        &DashboardDataset::sample(),
        &settings,
        &filter,
        DashboardDataset::sample_as_of(),
    )
    .expect("report builds");
    let summary = report.summary();

    assert!(summary.gauge.target_met);
    assert_eq!(summary.critical_gaps.len(), 2);
    assert_eq!(summary.upcoming_interviews.len(), 1);
    // full employer weight collapses the blend onto observed scores
    assert_eq!(summary.weighted_perception, summary.global_perception);
    assert!(summary
        .graduates
        .iter()
        .all(|graduate| graduate.program == "Ingeniería de Sistemas"));

    let graduates_kpi = summary
        .kpis
        .iter()
        .find(|kpi| kpi.kind == KpiKind::GraduatesSurveyed)
        .expect("graduates kpi");
    assert_eq!(graduates_kpi.value, summary.graduates.len() as f64);
}
