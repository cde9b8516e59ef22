use crate::infra::{DataSource, DatasetSources};
use chrono::{Local, NaiveDate};
use clap::Args;
use radar_egresados::config::{AppConfig, DashboardConfig};
use radar_egresados::dashboard::views::KpiUnit;
use radar_egresados::dashboard::{
    DashboardDataset, DashboardInsights, DashboardReport, DashboardSummary,
};
use radar_egresados::error::AppError;
use radar_egresados::import::SurveyImporter;
use radar_egresados::metrics::GraduateFilter;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Complete dataset as JSON; CSV exports override their kinds
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Competency survey export (competency,declared,observed,target)
    #[arg(long)]
    pub(crate) competencies: Option<PathBuf>,
    /// Employer survey export (employer,satisfaction,interviews)
    #[arg(long)]
    pub(crate) employers: Option<PathBuf>,
    /// Monthly snapshot export (month,employability,satisfaction)
    #[arg(long)]
    pub(crate) snapshots: Option<PathBuf>,
    /// Graduate roster export (id,name,program,year,employability_6m)
    #[arg(long)]
    pub(crate) graduates: Option<PathBuf>,
    /// Evaluation date for upcoming interviews (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of critical gaps to list
    #[arg(long)]
    pub(crate) limit: Option<NonZeroUsize>,
    /// Perception target (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) target: Option<u8>,
    /// Share of the blended perception taken from employer scores (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) employer_weight: Option<u8>,
    /// Only include graduates from this program
    #[arg(long)]
    pub(crate) program: Option<String>,
    /// Only include graduates from this cohort year
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Append observations and recommended actions
    #[arg(long)]
    pub(crate) insights: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to the sample survey date)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    data_source: DataSource,
    #[serde(flatten)]
    summary: &'a DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    insights: Option<&'a DashboardInsights>,
}

struct RenderedReport {
    summary: DashboardSummary,
    insights: Option<DashboardInsights>,
    data_source: DataSource,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let json = args.json;
    let settings = AppConfig::load()?.dashboard;
    let rendered = build_report(args, settings)?;

    emit(
        &rendered.summary,
        rendered.insights.as_ref(),
        rendered.data_source,
        json,
    )
}

/// Applies the CLI overrides on top of the configured dashboard settings.
fn build_report(
    args: ReportArgs,
    mut settings: DashboardConfig,
) -> Result<RenderedReport, AppError> {
    let ReportArgs {
        dataset,
        competencies,
        employers,
        snapshots,
        graduates,
        today,
        limit,
        target,
        employer_weight,
        program,
        year,
        json: _,
        insights,
    } = args;

    if let Some(limit) = limit {
        settings.critical_gap_limit = limit;
    }
    if let Some(target) = target {
        settings.perception_target = target;
    }
    if let Some(weight) = employer_weight {
        settings.employer_weight = weight;
    }

    let base = dataset
        .map(SurveyImporter::dataset_from_path)
        .transpose()?;
    let sources = DatasetSources {
        competencies,
        employers,
        snapshots,
        graduates,
    };
    let (dataset, data_source) = sources.load(base)?;
    let filter = GraduateFilter {
        cohort_year: year,
        program,
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = DashboardReport::build(&dataset, &settings, &filter, today)?;
    let summary = report.summary();
    let insights = insights.then(|| summary.insights());

    Ok(RenderedReport {
        summary,
        insights,
        data_source,
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = AppConfig::load()?.dashboard;
    let today = args.today.unwrap_or_else(DashboardDataset::sample_as_of);
    let report = DashboardReport::build(
        &DashboardDataset::sample(),
        &settings,
        &GraduateFilter::default(),
        today,
    )?;
    let summary = report.summary();
    let insights = summary.insights();

    emit(&summary, Some(&insights), DataSource::Sample, args.json)
}

fn emit(
    summary: &DashboardSummary,
    insights: Option<&DashboardInsights>,
    data_source: DataSource,
    json: bool,
) -> Result<(), AppError> {
    if json {
        let payload = JsonReport {
            data_source,
            summary,
            insights,
        };
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(summary, insights, data_source));
    }
    Ok(())
}

pub(crate) fn render_text(
    summary: &DashboardSummary,
    insights: Option<&DashboardInsights>,
    data_source: DataSource,
) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line("Graduate employability radar".to_string());
    line(format!("Evaluated: {}", summary.as_of));
    line(format!("Data source: {}", data_source.label()));

    line("\nKey indicators".to_string());
    for kpi in &summary.kpis {
        let value = match kpi.unit {
            KpiUnit::Count => format!("{:.0}", kpi.value),
            KpiUnit::Percent => format!("{:.0}%", kpi.value),
        };
        match kpi.trend {
            Some(trend) => line(format!("- {}: {} ({:+.0} pts)", kpi.label, value, trend)),
            None => line(format!("- {}: {}", kpi.label, value)),
        }
    }

    let gauge = &summary.gauge;
    line(format!(
        "\nGlobal perception: {}% (target {}%, {})",
        gauge.value, gauge.target, gauge.band_label
    ));
    line(format!(
        "Blended perception (employer weighted): {}%",
        summary.weighted_perception
    ));

    line("\nCompetency radar (declared / observed / target)".to_string());
    for entry in &summary.radar {
        line(format!(
            "- {}: {:.0} / {:.0} / {:.0}",
            entry.competency, entry.declared, entry.observed, entry.target
        ));
    }

    line("\nCritical gaps".to_string());
    for gap in &summary.critical_gaps {
        line(format!(
            "- {}: {:+.0} ({}, {} severity)",
            gap.competency, gap.gap, gap.direction_label, gap.severity_label
        ));
    }
    line(format!("Average gap: {:.1} points", summary.average_gap));

    match &summary.employer_rollup {
        Some(rollup) => {
            line(format!(
                "\nEmployers ({} surveyed, {} interviews)",
                rollup.employer_count, rollup.total_interviews
            ));
            for employer in &summary.employers {
                line(format!(
                    "- {}: {:.0}% satisfaction, {} interviews",
                    employer.name, employer.satisfaction_pct, employer.interview_count
                ));
            }
            line(format!(
                "Mean satisfaction {:.1}%, interview weighted {:.1}%",
                rollup.mean_satisfaction, rollup.weighted_satisfaction
            ));
        }
        None => line("\nEmployers: none surveyed".to_string()),
    }

    if summary.trend.is_empty() {
        line("\nMonthly trend: no snapshots".to_string());
    } else {
        line("\nMonthly trend (employability / satisfaction)".to_string());
        for point in &summary.trend {
            line(format!(
                "- {}: {:.0}% / {:.0}%",
                point.month, point.employability_pct, point.satisfaction_pct
            ));
        }
    }

    if summary.upcoming_interviews.is_empty() {
        line("\nUpcoming interviews: none".to_string());
    } else {
        line("\nUpcoming interviews".to_string());
        for interview in &summary.upcoming_interviews {
            line(format!("- {} on {}", interview.employer, interview.scheduled_on));
        }
    }

    if let Some(insights) = insights {
        line(format!("\nInsights ({})", insights.perception_label));
        for observation in &insights.observations {
            line(format!("- {observation}"));
        }
        if !insights.recommended_actions.is_empty() {
            line("\nRecommended actions".to_string());
            for action in &insights.recommended_actions {
                line(format!("- {action}"));
            }
        }
    }

    out
}
