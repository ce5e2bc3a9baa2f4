//! Layered configuration for the manager client and its command-line front end.
//!
//! Values resolve from defaults, an optional TOML file (`--config-path` or
//! `AMI_CONFIG_PATH`), `AMI_*` environment variables, and finally command-line
//! flags, in increasing order of precedence. Loading is delegated to
//! `ortho_config`; this crate only declares the shape and the defaults.

mod defaults;
mod logging;

use std::fmt;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the client library and the binary.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "AMI")]
pub struct Config {
    /// Host name or address of the manager interface.
    #[serde(default = "defaults::default_host")]
    pub host: String,
    /// TCP port of the manager interface.
    #[serde(default = "defaults::default_port")]
    pub port: u16,
    /// Login user name.
    #[serde(default)]
    pub username: String,
    /// Login secret.
    #[serde(default)]
    pub secret: String,
    /// Socket read timeout in milliseconds; `0` blocks indefinitely.
    #[serde(default = "defaults::default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// `tracing_subscriber::EnvFilter` expression.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::default_host(),
            port: DEFAULT_PORT,
            username: String::new(),
            secret: String::new(),
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            log_filter: defaults::default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured manager host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the configured manager port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the login user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the login secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the read timeout, or `None` when reads should block.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<std::time::Duration> {
        if self.read_timeout_ms == 0 {
            None
        } else {
            Some(std::time::Duration::from_millis(self.read_timeout_ms))
        }
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checks that the values describe a usable endpoint and login.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first field that is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field("log_filter", &self.log_filter)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Problems detected by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The host was blank.
    #[error("the manager host must not be empty")]
    EmptyHost,
    /// Port zero cannot be dialled.
    #[error("the manager port must be between 1 and 65535")]
    InvalidPort,
    /// No login user name was configured.
    #[error("a username is required to log in (set --username or AMI_USERNAME)")]
    MissingUsername,
}
