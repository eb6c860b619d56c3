use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_SERVICES_VIEW: &str = "Grid view";
pub const DEFAULT_AIRTABLE_TIMEOUT_MS: u64 = 10_000;

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
    pub airtable: AirtableSettings,
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
        let ansi = match optional_var("APP_LOG_ANSI") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "APP_LOG_ANSI",
            })?,
            None => false,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            airtable: AirtableSettings::from_env()?,
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

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Connection settings for the Airtable base backing the catalog and submissions.
///
/// Every credential is optional so that a partially configured deployment can
/// still serve the read path; each operation checks the subset it needs.
#[derive(Clone)]
pub struct AirtableSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub personal_access_token: Option<String>,
    pub base_id: Option<String>,
    pub services_table: Option<String>,
    pub submissions_table: Option<String>,
    pub services_view: String,
    pub timeout: Duration,
}

impl Default for AirtableSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_AIRTABLE_API_URL.to_string(),
            api_key: None,
            personal_access_token: None,
            base_id: None,
            services_table: None,
            submissions_table: None,
            services_view: DEFAULT_SERVICES_VIEW.to_string(),
            timeout: Duration::from_millis(DEFAULT_AIRTABLE_TIMEOUT_MS),
        }
    }
}

impl fmt::Debug for AirtableSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("AirtableSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field(
                "personal_access_token",
                &redact(&self.personal_access_token),
            )
            .field("base_id", &self.base_id)
            .field("services_table", &self.services_table)
            .field("submissions_table", &self.submissions_table)
            .field("services_view", &self.services_view)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AirtableSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms = match optional_var("AIRTABLE_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidTimeout),
            },
            None => DEFAULT_AIRTABLE_TIMEOUT_MS,
        };

        Ok(Self {
            api_url: optional_var("AIRTABLE_API_URL")
                .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_string()),
            api_key: optional_var("AIRTABLE_API_KEY"),
            personal_access_token: optional_var("AIRTABLE_PERSONAL_ACCESS_TOKEN"),
            base_id: optional_var("AIRTABLE_BASE_ID"),
            services_table: optional_var("AIRTABLE_SERVICES_TABLE"),
            submissions_table: optional_var("AIRTABLE_SUBMISSIONS_TABLE"),
            services_view: optional_var("AIRTABLE_SERVICES_VIEW")
                .unwrap_or_else(|| DEFAULT_SERVICES_VIEW.to_string()),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Read access to the services table, or `None` when any value is missing.
    pub fn services_access(&self) -> Option<TableAccess> {
        TableAccess::assemble(
            self.api_key.as_deref(),
            self.base_id.as_deref(),
            self.services_table.as_deref(),
        )
    }

    /// Write access to the submissions table, or `None` when any value is missing.
    pub fn submissions_access(&self) -> Option<TableAccess> {
        TableAccess::assemble(
            self.personal_access_token.as_deref(),
            self.base_id.as_deref(),
            self.submissions_table.as_deref(),
        )
    }
}

/// Fully resolved credentials for one Airtable table.
#[derive(Clone, PartialEq, Eq)]
pub struct TableAccess {
    pub token: String,
    pub base_id: String,
    pub table: String,
}

impl TableAccess {
    fn assemble(token: Option<&str>, base_id: Option<&str>, table: Option<&str>) -> Option<Self> {
        Some(Self {
            token: token?.to_string(),
            base_id: base_id?.to_string(),
            table: table?.to_string(),
        })
    }
}

impl fmt::Debug for TableAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableAccess")
            .field("token", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .finish()
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidFlag { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "AIRTABLE_TIMEOUT_MS must be a positive number of milliseconds")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be one of true/false/1/0/yes/no/on/off")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
