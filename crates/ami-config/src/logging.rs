//! Log record formats understood by the binary's subscriber.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the `ami` binary renders log records on stderr.
///
/// Set with `--log-format`, `AMI_LOG_FORMAT` or the `log_format` key of the
/// configuration file.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per record.
    #[default]
    Json,
    /// Single-line text records for interactive use.
    Compact,
}

/// Error returned when text names no [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
