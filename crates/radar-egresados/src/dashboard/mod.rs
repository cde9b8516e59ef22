//! View-model assembled from the metrics engine: one immutable report per
//! evaluation, its serializable summary and derived insights.

mod dataset;
mod insights;
mod report;
pub mod views;

pub use dataset::DashboardDataset;
pub use report::DashboardReport;
pub use views::{DashboardInsights, DashboardSummary};

pub(crate) use insights::generate_insights;
