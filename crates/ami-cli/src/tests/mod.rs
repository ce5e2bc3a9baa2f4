//! Behavioural tests for the CLI runtime against a fake manager.

mod support;

use std::ffi::OsString;
use std::process::ExitCode;

use ami_config::{Config, LogFormat};
use anyhow::Result;
use rstest::{fixture, rstest};

use self::support::{ACCEPTED, FakeManager, GOODBYE};
use crate::config::ConfigLoader;
use crate::{AppError, IoStreams, run_with_loader};

const LOGIN: &str = "Action: Login\r\nUsername: admin\r\nSecret: s3cret\r\n\r\n";
const LOGOFF: &str = "Action: Logoff\r\n\r\n";

struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

#[fixture]
fn config() -> Config {
    Config {
        host: String::from("127.0.0.1"),
        username: String::from("admin"),
        secret: String::from("s3cret"),
        read_timeout_ms: 200,
        log_filter: String::from("off"),
        log_format: LogFormat::Compact,
        ..Config::default()
    }
}

fn run(config: Config, args: &[&str]) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticConfigLoader { config };
    let argv = std::iter::once("ami")
        .chain(args.iter().copied())
        .map(OsString::from);
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with_loader(argv, &mut io, &loader)
    };
    Outcome {
        exit,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

fn manager(replies: &[&str]) -> Result<FakeManager> {
    FakeManager::spawn(replies.iter().map(|reply| String::from(*reply)).collect())
}

fn against(manager: &FakeManager, config: Config) -> Config {
    Config {
        port: manager.port(),
        ..config
    }
}

#[rstest]
fn ping_prints_the_reply(config: Config) -> Result<()> {
    let mut manager = manager(&[
        ACCEPTED,
        "Response: Success\r\nPing: Pong\r\nTimestamp: 1700000000.000000\r\n\r\n",
        GOODBYE,
    ])?;

    let outcome = run(against(&manager, config), &["ping"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        "Response: Success\nPing: Pong\nTimestamp: 1700000000.000000\n\n"
    );
    assert_eq!(
        manager.take_requests()?,
        vec![
            String::from(LOGIN),
            String::from("Action: Ping\r\n\r\n"),
            String::from(LOGOFF),
        ]
    );
    Ok(())
}

#[rstest]
fn command_joins_words_and_prints_json(config: Config) -> Result<()> {
    let mut manager = manager(&[
        ACCEPTED,
        "Response: Follows\r\nPrivilege: Command\r\nSystem uptime: 5 minutes\r\n--END COMMAND--\r\n\r\n",
        GOODBYE,
    ])?;

    let outcome = run(
        against(&manager, config),
        &["--json", "command", "core", "show", "uptime"],
    );

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        "{\"Response\":\"Follows\",\"data\":\"Privilege: CommandSystem uptime: 5 minutes\"}\n"
    );
    let requests = manager.take_requests()?;
    assert_eq!(
        requests.get(1).map(String::as_str),
        Some("Action: Command\r\nCommand: core show uptime\r\n\r\n")
    );
    Ok(())
}

#[rstest]
fn action_sends_parameters_and_reports_errors(config: Config) -> Result<()> {
    let mut manager = manager(&[
        ACCEPTED,
        "Response: Error\r\nMessage: No such channel\r\n\r\n",
        GOODBYE,
    ])?;

    let outcome = run(
        against(&manager, config),
        &["action", "Hangup", "Channel=SIP/100-0001"],
    );

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert_eq!(outcome.stdout, "Response: Error\nMessage: No such channel\n\n");
    let requests = manager.take_requests()?;
    assert_eq!(
        requests.get(1).map(String::as_str),
        Some("Action: Hangup\r\nChannel: SIP/100-0001\r\n\r\n")
    );
    Ok(())
}

#[rstest]
#[case(&["action", "Status", "Channel"], "must have the form Key=Value")]
#[case(&["action", "", "Channel=SIP/100"], "malformed request: an action name is required")]
fn malformed_actions_fail_before_dialling(
    config: Config,
    #[case] args: &[&str],
    #[case] message: &str,
) -> Result<()> {
    let mut manager = manager(&[ACCEPTED, GOODBYE])?;

    let outcome = run(against(&manager, config), args);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains(message), "stderr: {}", outcome.stderr);
    assert!(outcome.stdout.is_empty());
    assert!(manager.take_requests()?.is_empty());
    Ok(())
}

#[rstest]
fn rejected_login_fails_with_the_manager_message(config: Config) -> Result<()> {
    let mut manager = manager(&["Response: Error\r\nMessage: Authentication failed\r\n\r\n"])?;

    let outcome = run(against(&manager, config), &["ping"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(
        outcome
            .stderr
            .contains("login rejected by the manager: Authentication failed"),
        "stderr: {}",
        outcome.stderr
    );
    assert!(outcome.stdout.is_empty());
    assert_eq!(manager.take_requests()?, vec![String::from(LOGIN)]);
    Ok(())
}

#[rstest]
fn listen_prints_events_until_idle(config: Config) -> Result<()> {
    let mut manager = manager(&[
        concat!(
            "Response: Success\r\nMessage: Authentication accepted\r\n\r\n",
            "Event: PeerStatus\r\nPeer: SIP/100\r\nPeerStatus: Registered\r\n\r\n",
        ),
        concat!(
            "Response: Success\r\nEvents: On\r\n\r\n",
            "Event: Hangup\r\nChannel: SIP/100-0001\r\n\r\n",
        ),
        GOODBYE,
    ])?;

    let outcome = run(
        against(&manager, config),
        &["listen", "--idle-ticks", "2", "--events", "on"],
    );

    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout,
        concat!(
            "Event: PeerStatus\nPeer: SIP/100\nPeerStatus: Registered\n\n",
            "Event: Hangup\nChannel: SIP/100-0001\n\n",
        )
    );
    assert_eq!(
        manager.take_requests()?,
        vec![
            String::from(LOGIN),
            String::from("Action: Events\r\nEventMask: on\r\n\r\n"),
            String::from(LOGOFF),
        ]
    );
    Ok(())
}

#[rstest]
fn missing_username_fails_before_dialling(config: Config) {
    let outcome = run(
        Config {
            username: String::new(),
            port: 1,
            ..config
        },
        &["ping"],
    );

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("a username is required"));
}

#[rstest]
fn usage_errors_go_to_stderr(config: Config) {
    let outcome = run(config, &["dance"]);

    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("unrecognized subcommand"));
}

#[rstest]
fn help_goes_to_stdout(config: Config) {
    let outcome = run(config, &["--help"]);

    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("listen"));
}
