use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::interview::SequencerConfig;

const DEFAULT_MAX_ANSWERS: usize = 8;
const DEFAULT_SHORT_ANSWER_WORDS: usize = 15;
const DEFAULT_ASSESSMENT_TIME_LIMIT: u32 = 45;

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
    pub interview: InterviewConfig,
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

        let interview = InterviewConfig {
            max_answers: positive_var("INTERVIEW_MAX_ANSWERS", DEFAULT_MAX_ANSWERS)?,
            short_answer_words: positive_var(
                "INTERVIEW_SHORT_ANSWER_WORDS",
                DEFAULT_SHORT_ANSWER_WORDS,
            )?,
            assessment_time_limit_minutes: positive_u32_var(
                "ASSESSMENT_TIME_LIMIT_MINUTES",
                DEFAULT_ASSESSMENT_TIME_LIMIT,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            interview,
        })
    }
}

fn positive_u32_var(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let value = positive_var(key, default as usize)?;
    u32::try_from(value).map_err(|_| ConfigError::InvalidLimit {
        key,
        value: value.to_string(),
    })
}

fn positive_var(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidLimit { key, value: raw }),
        },
        Err(_) => Ok(default),
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

/// Business limits applied to every interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterviewConfig {
    pub max_answers: usize,
    pub short_answer_words: usize,
    pub assessment_time_limit_minutes: u32,
}

impl InterviewConfig {
    pub fn sequencer(&self) -> SequencerConfig {
        SequencerConfig {
            max_answers: self.max_answers,
            short_answer_words: self.short_answer_words,
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_answers: DEFAULT_MAX_ANSWERS,
            short_answer_words: DEFAULT_SHORT_ANSWER_WORDS,
            assessment_time_limit_minutes: DEFAULT_ASSESSMENT_TIME_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLimit { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLimit { key, value } => {
                write!(f, "{key} must be a positive integer (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
