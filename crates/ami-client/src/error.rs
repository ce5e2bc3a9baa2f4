//! Error types for the manager client.

use std::io;

use thiserror::Error;

/// Failures at the socket boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server address did not resolve to a usable socket address.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        /// The `host:port` pair that was looked up.
        endpoint: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Opening the connection failed.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        /// The `host:port` pair that was dialled.
        endpoint: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream.
    #[error("connection closed by the manager")]
    Closed,

    /// A read or write was attempted before `connect` succeeded.
    #[error("transport is not open")]
    NotOpen,

    /// Fewer bytes were accepted than were handed to `write`.
    #[error("short write: {written} of {expected} bytes sent")]
    ShortWrite {
        /// Bytes the transport reported as written.
        written: usize,
        /// Bytes the request contained.
        expected: usize,
    },
}

/// Raised when an action cannot be serialised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The action name was empty.
    #[error("an action name is required")]
    MissingAction,
}

/// Raised by [`crate::EventRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The event already has a handler; the existing one was kept.
    #[error("a handler for event '{event}' is already registered")]
    DuplicateHandler {
        /// Lower-cased event name.
        event: String,
    },
}

/// Errors surfaced by [`crate::Connection`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure. The connection has been torn down.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request could not be encoded; nothing was written.
    #[error("malformed request: {0}")]
    Encode(#[from] EncodeError),

    /// The server did not send a greeting line after the socket opened.
    #[error("the manager did not send a greeting")]
    MissingGreeting,

    /// The login response was not `Success`.
    #[error("login rejected by the manager{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    AuthenticationFailed {
        /// The `Message` field of the rejection, when present.
        message: Option<String>,
    },

    /// A request was issued while disconnected.
    #[error("not connected to the manager")]
    NotConnected,

    /// `connect` was called on a connection that is already open.
    #[error("already connected to the manager")]
    AlreadyConnected,
}

impl ClientError {
    /// Returns true when the error left the connection torn down.
    #[must_use]
    pub const fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::MissingGreeting | Self::AuthenticationFailed { .. }
        )
    }
}
