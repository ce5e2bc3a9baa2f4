//! Client engine for the Asterisk manager protocol.
//!
//! The manager speaks a line-oriented text protocol over TCP: the client
//! sends `Action` blocks, the server answers each with one `Response` block
//! and pushes unsolicited `Event` blocks at any time. This crate reads those
//! blocks off a [`Transport`], routes events to handlers held in an
//! [`EventRegistry`], and pairs each action with its response inside a
//! [`Connection`] that also owns the login/logoff lifecycle.
//!
//! Everything is blocking and single-threaded per connection: event handlers
//! run inline while a request waits for its response.

mod action;
mod block;
mod catalog;
mod commands;
mod connection;
mod dispatch;
mod error;
mod events;
mod reader;
mod transport;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use block::Block;
pub use catalog::Originate;
pub use commands::Reply;
pub use connection::{Connection, ConnectionState, Credentials};
pub use dispatch::{BlockClass, Dispatcher};
pub use error::{ClientError, EncodeError, RegistryError, TransportError};
pub use events::{Endpoint, EventHandler, EventRegistry, WILDCARD};
pub use reader::{DATA_FIELD, FOLLOWS, FOLLOWS_TERMINATOR, read_block};
pub use transport::{CONNECTION_TIMEOUT, TcpTransport, Transport};
