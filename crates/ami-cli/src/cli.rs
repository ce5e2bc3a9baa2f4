//! Command-line surface of the `ami` binary.
//!
//! Connection and logging flags are consumed by the configuration loader
//! before clap sees the arguments, so only output and subcommand options are
//! declared here.

use clap::{Parser, Subcommand};

/// Command-line interface for the `ami` manager client.
#[derive(Parser, Debug)]
#[command(name = "ami", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Prints each block as a JSON object instead of `Key: Value` lines.
    #[arg(long)]
    pub(crate) json: bool,
    /// The operation to run against the manager.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations supported by the binary.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Sends `Ping` and prints the reply.
    Ping,
    /// Runs a manager CLI command and prints its output.
    Command {
        /// The CLI command, for example `core show channels`.
        #[arg(value_name = "CLI", required = true, num_args = 1.., trailing_var_arg = true)]
        words: Vec<String>,
    },
    /// Sends an arbitrary action.
    Action {
        /// The action name, for example `QueueStatus`.
        #[arg(value_name = "NAME")]
        name: String,
        /// Parameters in `Key=Value` form.
        #[arg(value_name = "KEY=VALUE", num_args = 0.., allow_hyphen_values = true)]
        params: Vec<String>,
    },
    /// Prints events until the connection stays idle for a while.
    Listen {
        /// Stops after this many consecutive read timeouts without events.
        #[arg(long, value_name = "N")]
        idle_ticks: Option<u32>,
        /// Sends `Events` with this mask before listening.
        #[arg(long, value_name = "MASK")]
        events: Option<String>,
    },
}
