//! Runs one CLI command over a live manager session.

use std::io::Write;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use ami_client::{
    Action, Block, ClientError, Connection, Credentials, Endpoint, TcpTransport, Transport,
    WILDCARD,
};
use ami_config::Config;
use tracing::{debug, info};

use crate::AppError;
use crate::cli::CliCommand;
use crate::output::{OutputFormat, is_success, render_block};

/// Log target for CLI sessions.
const SESSION_TARGET: &str = "ami_cli::session";

/// Read timeout used by `listen` when none is configured, so idle ticks
/// can elapse.
const LISTEN_TICK: Duration = Duration::from_secs(1);

/// Whether the command ended in a state the caller should treat as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

/// What a session sends once logged in.
///
/// Built from the parsed command before anything is dialled, so a request
/// that cannot be encoded never reaches the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Plan {
    /// Sends one action and prints its reply.
    Request(Action),
    /// Optionally subscribes, then prints events until idle.
    Listen {
        subscribe: Option<Action>,
        idle_ticks: Option<u32>,
    },
}

impl Plan {
    /// Builds and encodes the requests `command` will send.
    pub(crate) fn from_command(command: &CliCommand) -> Result<Self, AppError> {
        let plan = match command {
            CliCommand::Ping => Self::Request(Action::ping()),
            CliCommand::Command { words } => Self::Request(Action::command(&words.join(" "), None)),
            CliCommand::Action { name, params } => Self::Request(parse_action(name, params)?),
            CliCommand::Listen { idle_ticks, events } => Self::Listen {
                subscribe: events.as_deref().map(Action::events),
                idle_ticks: *idle_ticks,
            },
        };
        if let Some(action) = plan.first_action() {
            action.encode().map_err(ClientError::from)?;
        }
        Ok(plan)
    }

    fn first_action(&self) -> Option<&Action> {
        match self {
            Self::Request(action) => Some(action),
            Self::Listen { subscribe, .. } => subscribe.as_ref(),
        }
    }

    /// Name used in logs.
    fn label(&self) -> &str {
        match self {
            Self::Request(action) => action.name(),
            Self::Listen { .. } => "listen",
        }
    }
}

/// Builds the TCP connection described by `config`.
pub(crate) fn tcp_connection(config: &Config, plan: &Plan) -> Connection<TcpTransport> {
    Connection::tcp(
        Endpoint::new(config.host(), config.port()),
        Credentials::new(config.username(), config.secret()),
        read_timeout(config, plan),
    )
}

fn read_timeout(config: &Config, plan: &Plan) -> Option<Duration> {
    match plan {
        Plan::Listen { .. } => config.read_timeout().or(Some(LISTEN_TICK)),
        Plan::Request(_) => config.read_timeout(),
    }
}

/// Connects, runs `plan`, and disconnects.
pub(crate) fn execute<T, W>(
    connection: &mut Connection<T>,
    plan: &Plan,
    format: OutputFormat,
    stdout: &mut W,
) -> Result<Outcome, AppError>
where
    T: Transport,
    W: Write,
{
    let events = capture_events(connection);
    connection.connect()?;
    info!(
        target: SESSION_TARGET,
        endpoint = %connection.endpoint(),
        plan = plan.label(),
        "session started"
    );

    let outcome = match plan {
        Plan::Request(action) => request(connection, action, format, stdout),
        Plan::Listen {
            subscribe,
            idle_ticks,
        } => listen(connection, &events, subscribe.as_ref(), *idle_ticks, format, stdout),
    };

    connection.disconnect();
    outcome
}

/// Routes every event into a channel drained between reads.
fn capture_events<T: Transport>(connection: &mut Connection<T>) -> Receiver<Block> {
    let (sender, receiver) = mpsc::channel();
    let registered = connection.add_event_handler(
        WILDCARD,
        move |_: &str, fields: &Block, _: &str, _: u16| {
            // The receiver lives until the session ends.
            let _ = sender.send(fields.clone());
        },
    );
    if let Err(error) = registered {
        debug!(target: SESSION_TARGET, %error, "event capture already installed");
    }
    receiver
}

fn request<T, W>(
    connection: &mut Connection<T>,
    action: &Action,
    format: OutputFormat,
    stdout: &mut W,
) -> Result<Outcome, AppError>
where
    T: Transport,
    W: Write,
{
    let reply = connection.send_action(action)?;
    render_block(stdout, &reply, format)?;
    Ok(if is_success(&reply) {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}

fn listen<T, W>(
    connection: &mut Connection<T>,
    events: &Receiver<Block>,
    subscribe: Option<&Action>,
    idle_limit: Option<u32>,
    format: OutputFormat,
    stdout: &mut W,
) -> Result<Outcome, AppError>
where
    T: Transport,
    W: Write,
{
    if let Some(subscribe) = subscribe {
        let reply = connection.send_action(subscribe)?;
        if !is_success(&reply) {
            render_block(stdout, &reply, format)?;
            return Ok(Outcome::Failure);
        }
    }

    let mut idle = 0u32;
    loop {
        let block = connection.wait_response(true)?;
        let printed = drain(events, format, stdout)?;

        if !block.is_timeout() {
            render_block(stdout, &block, format)?;
        }

        if printed > 0 || !block.is_timeout() {
            idle = 0;
            continue;
        }

        idle += 1;
        if idle_limit.is_some_and(|limit| idle >= limit) {
            debug!(target: SESSION_TARGET, idle, "idle limit reached");
            return Ok(Outcome::Success);
        }
    }
}

fn drain<W: Write>(events: &Receiver<Block>, format: OutputFormat, stdout: &mut W) -> Result<usize, AppError> {
    let mut printed = 0;
    for event in events.try_iter() {
        render_block(stdout, &event, format)?;
        printed += 1;
    }
    Ok(printed)
}

/// Builds an action from its name and `Key=Value` parameters.
pub(crate) fn parse_action(name: &str, params: &[String]) -> Result<Action, AppError> {
    params.iter().try_fold(Action::new(name), |action, param| {
        param
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| action.param(key, value))
            .ok_or_else(|| AppError::InvalidParameter(param.clone()))
    })
}
