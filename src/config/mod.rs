use crate::workflows::contacts::NormalizerOptions;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

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
    pub normalizer: NormalizerOptions,
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
            normalizer: load_normalizer_options()?,
        })
    }
}

fn load_normalizer_options() -> Result<NormalizerOptions, ConfigError> {
    let defaults = NormalizerOptions::default();

    let title_min_score = match env::var("CONTACTS_TITLE_MIN_SCORE") {
        Ok(raw) if !raw.trim().is_empty() => {
            let score = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|score| *score <= 100)
                .ok_or_else(|| ConfigError::InvalidOption {
                    key: "CONTACTS_TITLE_MIN_SCORE",
                    reason: format!("'{raw}' is not a score between 0 and 100"),
                })?;
            Some(score)
        }
        _ => defaults.title_min_score,
    };

    let street_label = match env::var("CONTACTS_STREET_LABEL") {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidOption {
                    key: "CONTACTS_STREET_LABEL",
                    reason: format!("'{raw}' is not a boolean"),
                })
            }
        },
        Err(_) => defaults.street_label,
    };

    Ok(NormalizerOptions {
        phone_format: env_option("CONTACTS_PHONE_FORMAT")?.unwrap_or(defaults.phone_format),
        phone_region: env_option("CONTACTS_PHONE_REGION")?.unwrap_or(defaults.phone_region),
        name_case: env_option("CONTACTS_NAME_CASE")?.unwrap_or(defaults.name_case),
        output_mode: env_option("CONTACTS_OUTPUT_MODE")?.unwrap_or(defaults.output_mode),
        title_catalog: env_option("CONTACTS_TITLE_CATALOG")?.unwrap_or(defaults.title_catalog),
        title_min_score,
        street_label,
    })
}

fn env_option<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|reason| ConfigError::InvalidOption { key, reason }),
        Err(_) => Ok(None),
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidOption { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidOption { key, reason } => write!(f, "{key}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidOption { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
