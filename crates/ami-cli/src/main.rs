//! Entry point for the `ami` manager client.
//!
//! The binary delegates to [`ami_cli::run`], which loads configuration,
//! installs telemetry, and runs one command against the configured manager.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    ami_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
