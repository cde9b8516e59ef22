use crate::infra::{deserialize_optional_date, AppState, DataSource, DatasetSources};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use radar_egresados::config::DashboardConfig;
use radar_egresados::dashboard::{
    DashboardDataset, DashboardInsights, DashboardReport, DashboardSummary,
};
use radar_egresados::error::AppError;
use radar_egresados::metrics::{GraduateFilter, MetricsError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::num::NonZeroUsize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardReportRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) competencies_csv: Option<String>,
    #[serde(default)]
    pub(crate) employers_csv: Option<String>,
    #[serde(default)]
    pub(crate) snapshots_csv: Option<String>,
    #[serde(default)]
    pub(crate) graduates_csv: Option<String>,
    #[serde(default)]
    pub(crate) critical_gap_limit: Option<NonZeroUsize>,
    #[serde(default)]
    pub(crate) perception_target: Option<u8>,
    #[serde(default)]
    pub(crate) employer_weight: Option<u8>,
    #[serde(default)]
    pub(crate) filter: GraduateFilter,
    #[serde(default)]
    pub(crate) include_insights: bool,
    #[serde(default)]
    pub(crate) dataset: Option<DashboardDataset>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardReportResponse {
    pub(crate) data_source: DataSource,
    #[serde(flatten)]
    pub(crate) summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) insights: Option<DashboardInsights>,
}

pub(crate) fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard/sample", get(sample_dashboard_endpoint))
        .route("/api/v1/dashboard/report", post(dashboard_report_endpoint))
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn sample_dashboard_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<DashboardReportResponse>, AppError> {
    let report = DashboardReport::build(
        &DashboardDataset::sample(),
        &state.dashboard,
        &GraduateFilter::default(),
        DashboardDataset::sample_as_of(),
    )?;
    let summary = report.summary();
    let insights = summary.insights();

    Ok(Json(DashboardReportResponse {
        data_source: DataSource::Sample,
        summary,
        insights: Some(insights),
    }))
}

pub(crate) async fn dashboard_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardReportRequest>,
) -> Result<Json<DashboardReportResponse>, AppError> {
    let DashboardReportRequest {
        today,
        competencies_csv,
        employers_csv,
        snapshots_csv,
        graduates_csv,
        critical_gap_limit,
        perception_target,
        employer_weight,
        filter,
        include_insights,
        dataset,
    } = payload;

    let settings = request_settings(
        &state.dashboard,
        critical_gap_limit,
        perception_target,
        employer_weight,
    )?;

    let sources = DatasetSources {
        competencies: competencies_csv,
        employers: employers_csv,
        snapshots: snapshots_csv,
        graduates: graduates_csv,
    };
    let (dataset, data_source) = sources.load(dataset)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = DashboardReport::build(&dataset, &settings, &filter, today)?;
    let summary = report.summary();
    let insights = if include_insights {
        Some(summary.insights())
    } else {
        None
    };

    info!(
        ?data_source,
        %today,
        global_perception = summary.global_perception,
        "dashboard report served"
    );

    Ok(Json(DashboardReportResponse {
        data_source,
        summary,
        insights,
    }))
}

fn request_settings(
    defaults: &DashboardConfig,
    critical_gap_limit: Option<NonZeroUsize>,
    perception_target: Option<u8>,
    employer_weight: Option<u8>,
) -> Result<DashboardConfig, MetricsError> {
    let mut settings = defaults.clone();

    if let Some(limit) = critical_gap_limit {
        settings.critical_gap_limit = limit;
    }
    if let Some(target) = perception_target {
        settings.perception_target = checked_score("perception_target", target)?;
    }
    if let Some(weight) = employer_weight {
        settings.employer_weight = checked_score("employer_weight", weight)?;
    }

    Ok(settings)
}

fn checked_score(field: &'static str, value: u8) -> Result<u8, MetricsError> {
    if value <= 100 {
        Ok(value)
    } else {
        Err(MetricsError::OutOfRange {
            field,
            value: f64::from(value),
        })
    }
}
