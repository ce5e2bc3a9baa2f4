//! In-memory transport doubles.
//!
//! [`ScriptedTransport`] replays a fixed sequence of lines and read timeouts
//! and records everything written to it, so parser and dispatcher tests can
//! describe a manager session as wire text.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::TransportError;
use crate::transport::Transport;

enum Step {
    Line(String),
    Timeout,
    Fail(io::ErrorKind),
}

/// What a [`ScriptedTransport`] observed, shared with the test after the
/// transport has been moved into a connection.
#[derive(Debug, Default)]
pub(crate) struct Record {
    pub(crate) connects: Vec<(String, u16)>,
    pub(crate) written: String,
    pub(crate) closes: usize,
}

/// Transport that plays back a script and reports end of stream afterwards.
pub(crate) struct ScriptedTransport {
    steps: VecDeque<Step>,
    record: Arc<Mutex<Record>>,
    refuse_connect: bool,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            record: Arc::default(),
            refuse_connect: false,
        }
    }

    /// Starts a script from raw wire text, one step per line.
    pub(crate) fn from_wire(wire: &str) -> Self {
        Self::new().wire(wire)
    }

    /// Appends the lines of `wire`, terminators included.
    pub(crate) fn wire(mut self, wire: &str) -> Self {
        self.steps
            .extend(wire.split_inclusive('\n').map(|line| Step::Line(line.to_owned())));
        self
    }

    /// Appends a read timeout.
    pub(crate) fn timeout(mut self) -> Self {
        self.steps.push_back(Step::Timeout);
        self
    }

    /// Appends a read failure of the given kind.
    pub(crate) fn failure(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Makes `connect` fail with a refused connection.
    pub(crate) fn refusing(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Shared view of the recorded activity.
    pub(crate) fn record(&self) -> Arc<Mutex<Record>> {
        Arc::clone(&self.record)
    }

    /// Steps not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn log(&self) -> MutexGuard<'_, Record> {
        self.record
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Transport for ScriptedTransport {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError> {
        self.log().connects.push((host.to_owned(), port));
        if self.refuse_connect {
            return Err(TransportError::Connect {
                endpoint: format!("{host}:{port}"),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        match self.steps.pop_front() {
            Some(Step::Line(line)) => Ok(Some(line)),
            Some(Step::Timeout) => Ok(None),
            Some(Step::Fail(kind)) => Err(TransportError::Io(io::Error::from(kind))),
            None => Err(TransportError::Closed),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        self.log()
            .written
            .push_str(&String::from_utf8_lossy(bytes));
        Ok(bytes.len())
    }

    fn close(&mut self) {
        self.log().closes += 1;
    }
}
