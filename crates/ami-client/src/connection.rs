//! Session lifecycle: open, greet, log in, exchange actions, log off.
//!
//! A [`Connection`] owns its transport, its credentials and its event
//! registry. Every failure that leaves the socket in an unknown state tears
//! the session down: the transport is closed once and the state returns to
//! [`ConnectionState::Disconnected`], so a later [`Connection::connect`]
//! starts from scratch.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::action::Action;
use crate::block::Block;
use crate::dispatch::Dispatcher;
use crate::error::{ClientError, RegistryError, TransportError};
use crate::events::{Endpoint, EventHandler, EventRegistry};
use crate::transport::{TcpTransport, Transport};

/// Log target for connection lifecycle events.
pub(crate) const CONNECTION_TARGET: &str = "ami_client::connection";

/// Username and secret presented by the `Login` action.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    /// Bundles a username and secret.
    #[must_use]
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// The manager account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Lifecycle state of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket is open.
    Disconnected,
    /// The greeting has been read; login is in progress.
    Connected,
    /// Login succeeded and actions may be sent.
    Authenticated,
}

/// A manager session over a [`Transport`].
pub struct Connection<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    credentials: Credentials,
    events: EventRegistry,
    state: ConnectionState,
    greeting: Option<String>,
}

impl Connection<TcpTransport> {
    /// Builds a TCP session.
    ///
    /// `read_timeout` bounds each line read; `None` blocks until data arrives.
    #[must_use]
    pub fn tcp(endpoint: Endpoint, credentials: Credentials, read_timeout: Option<Duration>) -> Self {
        Self::new(
            TcpTransport::new().with_read_timeout(read_timeout),
            endpoint,
            credentials,
        )
    }
}

impl<T: Transport> Connection<T> {
    /// Wraps an unopened transport. Nothing is sent until [`Connection::connect`].
    #[must_use]
    pub fn new(transport: T, endpoint: Endpoint, credentials: Credentials) -> Self {
        Self {
            transport,
            endpoint,
            credentials,
            events: EventRegistry::new(),
            state: ConnectionState::Disconnected,
            greeting: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns true once login has succeeded and until teardown.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, ConnectionState::Authenticated)
    }

    /// The banner line sent by the manager on connect, terminator trimmed.
    #[must_use]
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }

    /// The manager this connection talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The event handlers consulted while waiting for responses.
    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// Registers an event handler; see [`EventRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHandler`] when `event` already has one.
    pub fn add_event_handler<H>(&mut self, event: &str, handler: H) -> Result<(), RegistryError>
    where
        H: EventHandler + 'static,
    {
        self.events.register(event, handler)
    }

    /// Opens the socket, reads the greeting and logs in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyConnected`] when a session is open. Any
    /// other failure leaves the connection disconnected with its transport
    /// closed.
    pub fn connect(&mut self) -> Result<(), ClientError> {
        if self.state != ConnectionState::Disconnected {
            return Err(ClientError::AlreadyConnected);
        }

        self.open()?;
        self.login()
    }

    /// Sends `action` and waits for its response, handling events that
    /// arrive first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] without a session,
    /// [`ClientError::Encode`] when the action has no name (nothing is
    /// written and the session stays open), and [`ClientError::Transport`]
    /// after tearing the session down on an I/O failure.
    pub fn send_action(&mut self, action: &Action) -> Result<Block, ClientError> {
        self.ensure_open()?;
        self.exchange(action, false)
    }

    /// Waits for the next response without sending anything.
    ///
    /// Events received meanwhile go to their handlers. With `allow_timeout`
    /// set, a read timeout returns the empty block, which lets callers idle
    /// on a connection that only receives events.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] without a session and
    /// [`ClientError::Transport`] after tearing the session down on an I/O
    /// failure.
    pub fn wait_response(&mut self, allow_timeout: bool) -> Result<Block, ClientError> {
        self.ensure_open()?;
        self.await_block(allow_timeout)
    }

    /// Logs off and closes the transport.
    ///
    /// The `Logoff` exchange is best-effort; the transport is closed whether
    /// or not it succeeds. Does nothing when already disconnected.
    pub fn disconnect(&mut self) {
        if self.state == ConnectionState::Disconnected {
            return;
        }

        match self.exchange(&Action::logoff(), true) {
            Ok(reply) => debug!(
                target: CONNECTION_TARGET,
                endpoint = %self.endpoint,
                reply = reply.get("Response").unwrap_or_default(),
                "logged off"
            ),
            Err(error) => debug!(
                target: CONNECTION_TARGET,
                endpoint = %self.endpoint,
                %error,
                "logoff failed, closing anyway"
            ),
        }

        if self.state != ConnectionState::Disconnected {
            self.teardown();
        }
    }

    fn open(&mut self) -> Result<(), ClientError> {
        let host = self.endpoint.host().to_owned();
        let port = self.endpoint.port();
        debug!(target: CONNECTION_TARGET, endpoint = %self.endpoint, "opening connection");

        if let Err(error) = self.transport.connect(&host, port) {
            warn!(target: CONNECTION_TARGET, endpoint = %self.endpoint, %error, "connect failed");
            self.teardown();
            return Err(error.into());
        }

        let greeting = match self.transport.read_line() {
            Ok(Some(line)) => line.trim_end_matches(['\r', '\n']).to_owned(),
            Ok(None) => {
                warn!(target: CONNECTION_TARGET, endpoint = %self.endpoint, "no greeting from manager");
                self.teardown();
                return Err(ClientError::MissingGreeting);
            }
            Err(error) => {
                self.teardown();
                return Err(error.into());
            }
        };

        debug!(target: CONNECTION_TARGET, greeting = greeting.as_str(), "manager greeting");
        self.greeting = Some(greeting);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    fn login(&mut self) -> Result<(), ClientError> {
        let login = Action::login(self.credentials.username(), &self.credentials.secret);
        let reply = self.exchange(&login, false)?;

        if reply.get("Response") == Some("Success") {
            self.state = ConnectionState::Authenticated;
            info!(
                target: CONNECTION_TARGET,
                endpoint = %self.endpoint,
                username = self.credentials.username(),
                "authenticated"
            );
            return Ok(());
        }

        let message = reply.get("Message").map(str::to_owned);
        warn!(
            target: CONNECTION_TARGET,
            endpoint = %self.endpoint,
            username = self.credentials.username(),
            message = message.as_deref().unwrap_or_default(),
            "login rejected"
        );
        self.teardown();
        Err(ClientError::AuthenticationFailed { message })
    }

    const fn ensure_open(&self) -> Result<(), ClientError> {
        match self.state {
            ConnectionState::Disconnected => Err(ClientError::NotConnected),
            ConnectionState::Connected | ConnectionState::Authenticated => Ok(()),
        }
    }

    /// Writes one action and waits for its response.
    fn exchange(&mut self, action: &Action, allow_timeout: bool) -> Result<Block, ClientError> {
        let wire = action.encode()?;
        debug!(target: CONNECTION_TARGET, action = action.name(), "sending action");

        if let Err(error) = self.write_all(wire.as_bytes()) {
            self.teardown();
            return Err(error.into());
        }
        self.await_block(allow_timeout)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let written = self.transport.write(bytes)?;
        if written == bytes.len() {
            Ok(())
        } else {
            Err(TransportError::ShortWrite {
                written,
                expected: bytes.len(),
            })
        }
    }

    fn await_block(&mut self, allow_timeout: bool) -> Result<Block, ClientError> {
        let result = Dispatcher::new(&mut self.transport, &mut self.events, &self.endpoint)
            .await_response(allow_timeout);
        result.map_err(|error| {
            warn!(target: CONNECTION_TARGET, endpoint = %self.endpoint, %error, "connection lost");
            self.teardown();
            ClientError::from(error)
        })
    }

    fn teardown(&mut self) {
        self.transport.close();
        self.state = ConnectionState::Disconnected;
        self.greeting = None;
        debug!(target: CONNECTION_TARGET, endpoint = %self.endpoint, "connection closed");
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<T: Transport> fmt::Debug for Connection<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("state", &self.state)
            .field("greeting", &self.greeting)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
