//! Unit and behavioural tests for the connection lifecycle.

pub(crate) mod support;

use std::collections::VecDeque;
use std::io;

use mockall::mock;
use rstest::{fixture, rstest};

use crate::{ClientError, Connection, ConnectionState, Credentials, Endpoint, Transport, TransportError};

mock! {
    pub Wire {}
    impl Transport for Wire {
        fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError>;
        fn read_line(&mut self) -> Result<Option<String>, TransportError>;
        fn write(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;
        fn close(&mut self);
    }
}

#[fixture]
fn endpoint() -> Endpoint {
    Endpoint::new("127.0.0.1", 5038)
}

#[fixture]
fn credentials() -> Credentials {
    Credentials::new("admin", "s3cret")
}

/// Feeds `wire` to `read_line` one line at a time, then reports end of stream.
fn replay(wire: &'static str) -> impl FnMut() -> Result<Option<String>, TransportError> + Send {
    let mut lines: VecDeque<String> = wire.split_inclusive('\n').map(str::to_owned).collect();
    move || lines.pop_front().map(Some).ok_or(TransportError::Closed)
}

#[rstest]
fn refused_connect_closes_once_and_sends_nothing(endpoint: Endpoint, credentials: Credentials) {
    let mut wire = MockWire::new();
    wire.expect_connect().once().returning(|host, port| {
        Err(TransportError::Connect {
            endpoint: format!("{host}:{port}"),
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        })
    });
    wire.expect_close().once().return_const(());
    wire.expect_write().never();
    wire.expect_read_line().never();
    let mut connection = Connection::new(wire, endpoint, credentials);

    let result = connection.connect();

    assert!(matches!(
        result,
        Err(ClientError::Transport(TransportError::Connect { .. }))
    ));
    assert_eq!(connection.state(), ConnectionState::Disconnected);
}

#[rstest]
fn missing_greeting_closes_before_login(endpoint: Endpoint, credentials: Credentials) {
    let mut wire = MockWire::new();
    wire.expect_connect().once().returning(|_, _| Ok(()));
    wire.expect_read_line().once().returning(|| Ok(None));
    wire.expect_write().never();
    wire.expect_close().once().return_const(());
    let mut connection = Connection::new(wire, endpoint, credentials);

    let result = connection.connect();

    assert!(matches!(result, Err(ClientError::MissingGreeting)));
    assert_eq!(connection.greeting(), None);
}

#[rstest]
fn rejected_login_closes_once_and_writes_nothing_else(
    endpoint: Endpoint,
    credentials: Credentials,
) {
    let mut wire = MockWire::new();
    wire.expect_connect().once().returning(|_, _| Ok(()));
    wire.expect_read_line().returning(replay(
        "Asterisk Call Manager/1.0\r\nResponse: Error\r\nMessage: Authentication failed\r\n\r\n",
    ));
    wire.expect_write()
        .once()
        .withf(|bytes| bytes.starts_with(b"Action: Login\r\n"))
        .returning(|bytes| Ok(bytes.len()));
    wire.expect_close().once().return_const(());
    let mut connection = Connection::new(wire, endpoint, credentials);

    let result = connection.connect();

    match result {
        Err(ClientError::AuthenticationFailed { message }) => {
            assert_eq!(message.as_deref(), Some("Authentication failed"));
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
    assert_eq!(connection.state(), ConnectionState::Disconnected);
}

#[rstest]
fn short_write_tears_the_session_down(endpoint: Endpoint, credentials: Credentials) {
    let mut wire = MockWire::new();
    wire.expect_connect().once().returning(|_, _| Ok(()));
    wire.expect_read_line()
        .returning(replay("Asterisk Call Manager/1.0\r\n"));
    wire.expect_write().once().returning(|bytes| Ok(bytes.len() - 1));
    wire.expect_close().once().return_const(());
    let mut connection = Connection::new(wire, endpoint, credentials);

    let result = connection.connect();

    assert!(matches!(
        result,
        Err(ClientError::Transport(TransportError::ShortWrite { .. }))
    ));
    assert_eq!(connection.state(), ConnectionState::Disconnected);
}

#[rstest]
fn dropping_an_open_connection_logs_off_and_closes(endpoint: Endpoint, credentials: Credentials) {
    let mut wire = MockWire::new();
    wire.expect_connect().once().returning(|_, _| Ok(()));
    wire.expect_read_line().returning(replay(concat!(
        "Asterisk Call Manager/1.0\r\n",
        "Response: Success\r\nMessage: Authentication accepted\r\n\r\n",
        "Response: Goodbye\r\nMessage: Thanks for all the fish.\r\n\r\n",
    )));
    wire.expect_write().times(2).returning(|bytes| Ok(bytes.len()));
    wire.expect_close().once().return_const(());
    let mut connection = Connection::new(wire, endpoint, credentials);
    connection.connect().expect("connect");

    drop(connection);
}

#[rstest]
fn credentials_debug_hides_the_secret(credentials: Credentials) {
    let rendered = format!("{credentials:?}");

    assert!(rendered.contains("admin"));
    assert!(!rendered.contains("s3cret"));
}
