use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL of this API, handed to the auth provider.
    pub api_domain: String,
    /// Origin of the web frontend; the only origin allowed by CORS.
    pub website_domain: String,
    /// Base URL of the auth provider core.
    pub auth_connection_uri: String,
    /// API key for the auth provider core.
    pub auth_api_key: String,
    pub app_name: String,
    pub port: u16,
    pub mode: Mode,
    pub log_level: LogLevel,
    /// Enables debug logging in the auth gateway client.
    pub auth_debug: bool,
    /// Path of the on-disk SQLite store file.
    pub db_file_path: String,
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

/// Minimum log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl Mode {
    /// Anything other than `"production"` is treated as development.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl LogLevel {
    /// Parse a log level name; unrecognized values fall back to `Info`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            _ => Self::Info,
        }
    }

    /// Directive form understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `AUTH_CONNECTION_URI`, `AUTH_API_KEY`, `PORT`.
    /// Optional with defaults: `API_DOMAIN`, `WEBSITE_DOMAIN`, `APP_NAME`,
    /// `MODE`, `LOG_LEVEL`, `AUTH_DEBUG`, `DB_FILE_PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or empty, or if
    /// `PORT` / `AUTH_DEBUG` fail to parse. The environment is read exactly
    /// once; callers treat any error as fatal.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup. Split out
    /// from [`Config::from_env`] so tests can exercise the required/optional
    /// and parse-failure semantics without mutating the process environment.
    fn load(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            api_domain: optional(var("API_DOMAIN"), "http://localhost:8080"),
            website_domain: optional(var("WEBSITE_DOMAIN"), "http://localhost:5173"),
            auth_connection_uri: required("AUTH_CONNECTION_URI", var("AUTH_CONNECTION_URI"))?,
            auth_api_key: required("AUTH_API_KEY", var("AUTH_API_KEY"))?,
            app_name: optional(var("APP_NAME"), "My Server"),
            port: parse_port(var("PORT"))?,
            mode: Mode::parse(&optional(var("MODE"), "production")),
            log_level: LogLevel::parse(&optional(var("LOG_LEVEL"), "info")),
            auth_debug: parse_bool("AUTH_DEBUG", var("AUTH_DEBUG"))?,
            db_file_path: optional(var("DB_FILE_PATH"), "data.db"),
        })
    }

    /// Address the server binds to: all interfaces on the configured port.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

fn required(key: &str, value: Option<String>) -> anyhow::Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("please set the {key} environment variable"))
}

fn optional(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_port(value: Option<String>) -> anyhow::Result<u16> {
    required("PORT", value)?
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("the PORT environment variable must be an integer"))
}

fn parse_bool(key: &str, value: Option<String>) -> anyhow::Result<bool> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse::<bool>()
            .map_err(|_| anyhow::anyhow!("the {key} environment variable must be a boolean")),
        None => Ok(false),
    }
}
