pub mod config;
pub mod dashboard;
pub mod error;
pub mod import;
pub mod metrics;
pub mod telemetry;
