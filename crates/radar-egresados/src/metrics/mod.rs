//! Pure computations that turn survey and interview records into the
//! figures shown on the graduate outcomes dashboard. Nothing here performs
//! I/O or mutates its input.

pub mod domain;
mod employers;
mod engine;
mod graduates;
mod trend;

pub use domain::{
    CompetencyRecord, EmployerRecord, GapRecord, GraduateRecord, InterviewAppointment,
    MetricsError, MonthlySnapshot, Percentage,
};
pub use employers::{
    build_employer_view, compute_employer_rollup, upcoming_interviews, EmployerRollup,
};
pub use engine::{
    compute_average_gap, compute_gaps, compute_global_perception, compute_weighted_perception,
    perception_gauge, rank_critical_gaps, PerceptionBand, PerceptionGauge,
    CRITICAL_PERCEPTION_FLOOR,
};
pub use graduates::{compute_employability_rate, GraduateFilter};
pub use trend::{build_trend_series, compute_trend_deltas, MonthCalendar, TrendDelta};
