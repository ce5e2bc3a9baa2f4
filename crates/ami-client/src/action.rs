//! Action requests and their wire encoding.

use std::fmt;

use crate::error::EncodeError;

/// A named action plus its parameters, in insertion order.
///
/// Values are stored as text; writing a parameter that already exists
/// replaces its value in place. Parameters supplied as `None` are never
/// stored, so they never reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    name: String,
    params: Vec<(String, String)>,
}

impl Action {
    /// Starts an action with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter, rendering `value` with its `Display` impl.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    /// Adds a parameter when `value` is present.
    #[must_use]
    pub fn param_opt<V>(self, key: impl Into<String>, value: Option<V>) -> Self
    where
        V: fmt::Display,
    {
        match value {
            Some(present) => self.param(key, present),
            None => self,
        }
    }

    /// Writes a parameter in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let name = key.into();
        let text = value.to_string();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = text,
            None => self.params.push((name, text)),
        }
    }

    /// The action name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Looks up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Serialises the action into its wire form.
    ///
    /// Values are written verbatim; they must not contain line terminators.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::MissingAction`] when the name is empty.
    pub fn encode(&self) -> Result<String, EncodeError> {
        if self.name.is_empty() {
            return Err(EncodeError::MissingAction);
        }

        let mut wire = String::with_capacity(16 + self.params.len() * 24);
        push_line(&mut wire, "Action", &self.name);
        for (key, value) in &self.params {
            push_line(&mut wire, key, value);
        }
        wire.push_str("\r\n");
        Ok(wire)
    }
}

fn push_line(wire: &mut String, key: &str, value: &str) {
    wire.push_str(key);
    wire.push_str(": ");
    wire.push_str(value);
    wire.push_str("\r\n");
}
