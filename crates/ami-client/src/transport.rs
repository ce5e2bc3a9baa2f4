//! Line transport consumed by the protocol engine.
//!
//! The engine only needs four operations from a socket: open it, read one
//! line, write bytes, and close it. [`Transport`] captures that contract so
//! tests and embedders can supply their own implementation; [`TcpTransport`]
//! is the production one.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;

/// Log target for transport operations.
pub(crate) const TRANSPORT_TARGET: &str = "ami_client::transport";

/// Timeout applied while establishing the TCP connection.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal socket abstraction driven by [`crate::Connection`].
pub trait Transport {
    /// Opens the connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns an error when the address does not resolve or cannot be reached.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError>;

    /// Reads one line, including its terminator when one was received.
    ///
    /// Returns `Ok(None)` when the read timeout elapsed without a complete line.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] at end of stream and
    /// [`TransportError::Io`] for any other read failure.
    fn read_line(&mut self) -> Result<Option<String>, TransportError>;

    /// Writes `bytes` and returns how many were sent.
    ///
    /// # Errors
    ///
    /// Returns an error when the socket rejects the write.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;

    /// Closes the connection. Closing a transport that is not open is a no-op.
    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError> {
        (**self).connect(host, port)
    }

    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        (**self).read_line()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        (**self).write(bytes)
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Blocking TCP transport with an optional read timeout.
#[derive(Debug)]
pub struct TcpTransport {
    reader: Option<BufReader<TcpStream>>,
    pending: Vec<u8>,
    read_timeout: Option<Duration>,
}

impl TcpTransport {
    /// Creates an unopened transport whose reads block indefinitely.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reader: None,
            pending: Vec::new(),
            read_timeout: None,
        }
    }

    /// Sets the read timeout applied once the socket opens.
    ///
    /// When a read times out the transport reports `Ok(None)` and keeps any
    /// partial line for the next call.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Returns true while a socket is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    fn reader(&mut self) -> Result<&mut BufReader<TcpStream>, TransportError> {
        self.reader.as_mut().ok_or(TransportError::NotOpen)
    }

    fn take_line(&mut self) -> String {
        let bytes = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), TransportError> {
        let endpoint = format!("{host}:{port}");
        let address =
            resolve_tcp_address(host, port).map_err(|source| TransportError::Resolve {
                endpoint: endpoint.clone(),
                source,
            })?;

        let stream = TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| {
            TransportError::Connect {
                endpoint: endpoint.clone(),
                source,
            }
        })?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_nodelay(true)?;

        debug!(target: TRANSPORT_TARGET, %endpoint, "socket opened");
        self.pending.clear();
        self.reader = Some(BufReader::new(stream));
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut buffer = Vec::new();
        let outcome = self.reader()?.read_until(b'\n', &mut buffer);
        self.pending.extend_from_slice(&buffer);
        match outcome {
            Ok(0) if self.pending.is_empty() => Err(TransportError::Closed),
            Ok(_) => Ok(Some(self.take_line())),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                Ok(None)
            }
            Err(error) => Err(TransportError::Io(error)),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        let stream = self.reader()?.get_mut();
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(bytes.len())
    }

    fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            if let Err(error) = reader.get_ref().shutdown(Shutdown::Both) {
                debug!(target: TRANSPORT_TARGET, %error, "socket shutdown failed");
            }
            debug!(target: TRANSPORT_TARGET, "socket closed");
        }
        self.pending.clear();
    }
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
