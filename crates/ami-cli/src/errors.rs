//! Error type surfaced by the CLI runtime.

use std::io;
use std::sync::Arc;

use ami_client::ClientError;
use ami_config::ConfigError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("action parameter '{0}' must have the form Key=Value")]
    InvalidParameter(String),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("failed to serialise block: {0}")]
    SerialiseBlock(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
