use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dashboard: DashboardConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Thresholds the dashboard report is computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Global perception index considered on target (0-100).
    pub perception_target: u8,
    /// Number of competencies listed as critical gaps.
    pub critical_gap_limit: NonZeroUsize,
    pub upcoming_interviews: usize,
    /// Share of the blended perception taken from employer scores (0-100).
    pub employer_weight: u8,
}

impl DashboardConfig {
    pub const DEFAULT_PERCEPTION_TARGET: u8 = 75;
    pub const DEFAULT_CRITICAL_GAP_LIMIT: usize = 4;
    pub const DEFAULT_UPCOMING_INTERVIEWS: usize = 3;
    pub const DEFAULT_EMPLOYER_WEIGHT: u8 = 60;

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let perception_target = match env::var("RADAR_PERCEPTION_TARGET") {
            Ok(raw) => parse_percent(&raw).ok_or(ConfigError::InvalidPerceptionTarget)?,
            Err(_) => defaults.perception_target,
        };

        let critical_gap_limit = match env::var("RADAR_CRITICAL_GAP_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::InvalidCriticalGapLimit)?,
            Err(_) => defaults.critical_gap_limit,
        };

        let upcoming_interviews = match env::var("RADAR_UPCOMING_INTERVIEWS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidUpcomingInterviews)?,
            Err(_) => defaults.upcoming_interviews,
        };

        let employer_weight = match env::var("RADAR_EMPLOYER_WEIGHT") {
            Ok(raw) => parse_percent(&raw).ok_or(ConfigError::InvalidEmployerWeight)?,
            Err(_) => defaults.employer_weight,
        };

        Ok(Self {
            perception_target,
            critical_gap_limit,
            upcoming_interviews,
            employer_weight,
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            perception_target: Self::DEFAULT_PERCEPTION_TARGET,
            critical_gap_limit: NonZeroUsize::new(Self::DEFAULT_CRITICAL_GAP_LIMIT)
                .unwrap_or(NonZeroUsize::MIN),
            upcoming_interviews: Self::DEFAULT_UPCOMING_INTERVIEWS,
            employer_weight: Self::DEFAULT_EMPLOYER_WEIGHT,
        }
    }
}

fn parse_percent(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|value| *value <= 100)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPerceptionTarget,
    InvalidCriticalGapLimit,
    InvalidUpcomingInterviews,
    InvalidEmployerWeight,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPerceptionTarget => {
                write!(f, "RADAR_PERCEPTION_TARGET must be an integer between 0 and 100")
            }
            ConfigError::InvalidCriticalGapLimit => {
                write!(f, "RADAR_CRITICAL_GAP_LIMIT must be a positive integer")
            }
            ConfigError::InvalidUpcomingInterviews => {
                write!(f, "RADAR_UPCOMING_INTERVIEWS must be a non-negative integer")
            }
            ConfigError::InvalidEmployerWeight => {
                write!(f, "RADAR_EMPLOYER_WEIGHT must be an integer between 0 and 100")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "RADAR_PERCEPTION_TARGET",
            "RADAR_CRITICAL_GAP_LIMIT",
            "RADAR_UPCOMING_INTERVIEWS",
            "RADAR_EMPLOYER_WEIGHT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.dashboard, DashboardConfig::default());
        assert_eq!(config.dashboard.perception_target, 75);
        assert_eq!(config.dashboard.critical_gap_limit.get(), 4);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_dashboard_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RADAR_PERCEPTION_TARGET", "80");
        env::set_var("RADAR_CRITICAL_GAP_LIMIT", "2");
        env::set_var("RADAR_EMPLOYER_WEIGHT", "100");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.dashboard.perception_target, 80);
        assert_eq!(config.dashboard.critical_gap_limit.get(), 2);
        assert_eq!(config.dashboard.employer_weight, 100);
        reset_env();
    }

    #[test]
    fn rejects_zero_gap_limit_and_oversized_target() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RADAR_CRITICAL_GAP_LIMIT", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCriticalGapLimit)
        ));

        reset_env();
        env::set_var("RADAR_PERCEPTION_TARGET", "120");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPerceptionTarget)
        ));
        reset_env();
    }
}
