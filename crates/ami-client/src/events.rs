//! Event handler registry.
//!
//! Handlers are keyed by lower-cased event name. The `*` entry catches every
//! event without a specific handler. Registration is first-writer-wins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::debug;

use crate::block::Block;
use crate::error::RegistryError;

/// Log target for event dispatch.
pub(crate) const EVENTS_TARGET: &str = "ami_client::events";

/// Registry key matching any event without a dedicated handler.
pub const WILDCARD: &str = "*";

/// Host and port of the manager a connection talks to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Builds an endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or address.
    #[must_use]
    pub const fn host(&self) -> &str {
        self.host.as_str()
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

/// Receives events pushed by the manager.
///
/// Closures of the form `FnMut(&str, &Block, &str, u16)` implement this
/// trait, so most callers never name it.
pub trait EventHandler: Send {
    /// Handles one event.
    ///
    /// `event` is the lower-cased event name, `fields` the whole block, and
    /// `host`/`port` identify the manager that sent it.
    fn handle(&mut self, event: &str, fields: &Block, host: &str, port: u16);
}

impl<F> EventHandler for F
where
    F: FnMut(&str, &Block, &str, u16) + Send,
{
    fn handle(&mut self, event: &str, fields: &Block, host: &str, port: u16) {
        self(event, fields, host, port);
    }
}

/// Per-connection table of event handlers.
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<String, Box<dyn EventHandler>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for `event` (case-insensitive) or for [`WILDCARD`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHandler`] when the name already has a
    /// handler. The existing handler stays installed.
    pub fn register<H>(&mut self, event: &str, handler: H) -> Result<(), RegistryError>
    where
        H: EventHandler + 'static,
    {
        self.register_boxed(event, Box::new(handler))
    }

    /// Boxed form of [`EventRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHandler`] when the name is taken.
    pub fn register_boxed(
        &mut self,
        event: &str,
        handler: Box<dyn EventHandler>,
    ) -> Result<(), RegistryError> {
        let key = event.to_lowercase();
        match self.handlers.entry(key) {
            Entry::Occupied(entry) => {
                debug!(
                    target: EVENTS_TARGET,
                    event = entry.key().as_str(),
                    "handler already defined, not overwriting"
                );
                Err(RegistryError::DuplicateHandler {
                    event: entry.key().clone(),
                })
            }
            Entry::Vacant(entry) => {
                entry.insert(handler);
                Ok(())
            }
        }
    }

    /// Returns true when `event` has a dedicated handler.
    #[must_use]
    pub fn contains(&self, event: &str) -> bool {
        self.handlers.contains_key(&event.to_lowercase())
    }

    /// Number of installed handlers, the wildcard included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when no handler is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Routes an event block to its handler.
    ///
    /// Looks up the lower-cased `Event` field, then falls back to the
    /// wildcard. Returns whether a handler ran; unmatched events are dropped.
    pub fn dispatch(&mut self, block: &Block, origin: &Endpoint) -> bool {
        let event = block
            .get_ignore_case("Event")
            .unwrap_or_default()
            .to_lowercase();
        debug!(target: EVENTS_TARGET, event = event.as_str(), "got event");

        let handler = if self.handlers.contains_key(&event) {
            self.handlers.get_mut(&event)
        } else {
            self.handlers.get_mut(WILDCARD)
        };

        match handler {
            Some(handler) => {
                handler.handle(&event, block, origin.host(), origin.port());
                true
            }
            None => {
                debug!(
                    target: EVENTS_TARGET,
                    event = event.as_str(),
                    "no event handler for event"
                );
                false
            }
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        formatter
            .debug_struct("EventRegistry")
            .field("handlers", &names)
            .finish()
    }
}
