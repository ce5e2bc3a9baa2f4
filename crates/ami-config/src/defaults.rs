//! Default values shared by the configuration loader and its consumers.

use crate::logging::LogFormat;

/// Default manager interface host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default manager interface TCP port.
pub const DEFAULT_PORT: u16 = 5038;

/// Default read timeout in milliseconds. Zero blocks indefinitely.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 0;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned default host used by serde.
pub fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Default port used by serde.
pub fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default read timeout used by serde.
pub fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}
