//! HTTP listener settings.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Hard cap on one HTTP request. Unset means "as long as the slowest
    /// possible turn", see [`ServerConfig::request_timeout`].
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Comma-separated browser origins; empty allows any
    #[serde(default)]
    pub cors_origins: String,
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidSocketAddr(raw))
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The configured request timeout, or `turn_budget` when none is set.
    ///
    /// A submit request holds the connection for a whole turn, so the
    /// fallback is the worst-case time the backend calls of one turn take.
    pub fn request_timeout(&self, turn_budget: Duration) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(turn_budget)
    }

    /// `attempt_timeout` is the budget of a single model call; an explicit
    /// request timeout below it would cut off every turn.
    pub fn validate(&self, attempt_timeout: Duration) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if let Some(secs) = self.request_timeout_secs {
            if secs == 0 || Duration::from_secs(secs) < attempt_timeout {
                return Err(ValidationError::InvalidTimeout);
            }
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            request_timeout_secs: None,
            cors_origins: String::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,idea_intake=debug".to_string()
}
