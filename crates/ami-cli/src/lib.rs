//! Command-line runtime for the `ami` manager client.
//!
//! The runtime splits configuration flags from the command, checks the
//! request it will send, loads the layered configuration, installs
//! telemetry, and runs the request over a fresh manager session. IO streams and the configuration loader are
//! injectable so tests can drive the whole flow against a fake manager.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use ami_config::Config;
use clap::Parser;

mod cli;
mod config;
mod errors;
mod output;
mod session;
mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
pub(crate) use errors::AppError;
use output::OutputFormat;
use session::{Outcome, Plan, execute, tcp_connection};

#[cfg(test)]
mod tests;

/// Bundles the writers handed to the runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

/// A checked plan plus the configuration it runs under.
struct Invocation {
    plan: Plan,
    format: OutputFormat,
    config: Config,
}

struct CliRunner<'a, 'io, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'io, W, E>,
    loader: &'a L,
}

impl<'a, 'io, W, E, L> CliRunner<'a, 'io, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'io, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let result = self.prepare(args).and_then(|invocation| {
            let mut connection = tcp_connection(&invocation.config, &invocation.plan);
            execute(
                &mut connection,
                &invocation.plan,
                invocation.format,
                &mut *self.io.stdout,
            )
        });

        match result {
            Ok(Outcome::Success) => ExitCode::SUCCESS,
            Ok(Outcome::Failure) => ExitCode::FAILURE,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn prepare<I>(&self, args: I) -> Result<Invocation, AppError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli = Cli::try_parse_from(command_arguments(&args, &split)).map_err(AppError::CliUsage)?;
        let plan = Plan::from_command(&cli.command)?;
        let config = self.loader.load(&split.config_arguments)?;
        config.validate()?;
        telemetry::initialise(&config)?;
        Ok(Invocation {
            plan,
            format: OutputFormat::from_json_flag(cli.json),
            config,
        })
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(args: I, io: &mut IoStreams<'_, W, E>, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}
