//! Protocol blocks: the ordered field maps exchanged with the manager.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One block received from the manager.
///
/// Fields keep wire order and the case they were received in. Writing a
/// field that already exists replaces its value in place. The block's type
/// tag is the lower-cased name of its first field, or the empty string for
/// the empty block produced by a read timeout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    kind: String,
    fields: Vec<(String, String)>,
}

impl Block {
    /// Creates an empty block (the timeout block).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: String::new(),
            fields: Vec::new(),
        }
    }

    /// Builds a block from fields in order, deriving the type tag from the first.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut block = Self::new();
        for (key, value) in fields {
            let name = key.into();
            if block.fields.is_empty() {
                block.kind = name.to_lowercase();
            }
            block.insert(name, value);
        }
        block
    }

    /// Lower-cased name of the first field (`"response"`, `"event"`, ...).
    #[must_use]
    pub const fn kind(&self) -> &str {
        self.kind.as_str()
    }

    pub(crate) fn set_kind(&mut self, kind: String) {
        self.kind = kind;
    }

    /// Returns true for the empty block a read timeout produces.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        self.kind.is_empty()
    }

    /// Looks up a field by its exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Looks up a field ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            self.fields
                .iter()
                .find(|(field, _)| field.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Writes a field, replacing the value of an existing field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let key = name.into();
        let text = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == key) {
            Some((_, existing)) => *existing = text,
            None => self.fields.push((key, text)),
        }
    }

    /// Appends `chunk` to the value of `name`, creating the field when absent.
    pub(crate) fn append(&mut self, name: &str, chunk: &str) {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => existing.push_str(chunk),
            None => self.fields.push((name.to_owned(), chunk.to_owned())),
        }
    }

    /// Iterates over `(name, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the block carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true when the `Response` field reads `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.get("Response") == Some("Success")
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
