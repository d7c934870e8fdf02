use crate::compliance::{DEFAULT_FORECAST_MONTHS, DEFAULT_SOON_WINDOW_DAYS};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const MAX_FORECAST_MONTHS: u32 = 24;

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
    pub compliance: ComplianceConfig,
    pub data: DataConfig,
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

        let soon_window_days = match env::var("APP_SOON_WINDOW_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidSoonWindow)?,
            Err(_) => DEFAULT_SOON_WINDOW_DAYS,
        };

        let forecast_months = match env::var("APP_FORECAST_MONTHS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|months| (1..=MAX_FORECAST_MONTHS).contains(months))
                .ok_or(ConfigError::InvalidForecastMonths)?,
            Err(_) => DEFAULT_FORECAST_MONTHS,
        };

        let assignments_csv = env::var_os("APP_ASSIGNMENTS_CSV").map(PathBuf::from);
        let employees_csv = env::var_os("APP_EMPLOYEES_CSV").map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            compliance: ComplianceConfig {
                soon_window_days,
                forecast_months,
            },
            data: DataConfig {
                assignments_csv,
                employees_csv,
            },
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

/// Horizons used by the classifier and the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceConfig {
    pub soon_window_days: u32,
    pub forecast_months: u32,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            soon_window_days: DEFAULT_SOON_WINDOW_DAYS,
            forecast_months: DEFAULT_FORECAST_MONTHS,
        }
    }
}

/// Optional CSV exports used to seed the in-memory data source.
#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    pub assignments_csv: Option<PathBuf>,
    pub employees_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSoonWindow,
    InvalidForecastMonths,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSoonWindow => {
                write!(f, "APP_SOON_WINDOW_DAYS must be a positive number of days")
            }
            ConfigError::InvalidForecastMonths => write!(
                f,
                "APP_FORECAST_MONTHS must be between 1 and {MAX_FORECAST_MONTHS}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSoonWindow
            | ConfigError::InvalidForecastMonths => None,
        }
    }
}
