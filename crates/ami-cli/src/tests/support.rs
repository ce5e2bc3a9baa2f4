//! Fake manager for behavioural tests.
//!
//! Listens on an ephemeral port, greets the first client, and answers each
//! action block with the next canned reply. Requests are recorded so tests
//! can check what reached the wire.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

pub(crate) const GREETING: &str = "Asterisk Call Manager/1.1\r\n";
pub(crate) const ACCEPTED: &str = "Response: Success\r\nMessage: Authentication accepted\r\n\r\n";
pub(crate) const GOODBYE: &str = "Response: Goodbye\r\nMessage: Thanks for all the fish.\r\n\r\n";

pub(crate) struct FakeManager {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeManager {
    /// Spawns a manager answering with `replies` in order.
    pub(crate) fn spawn(replies: Vec<String>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake manager")?;
        listener
            .set_nonblocking(true)
            .context("fake manager nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || Self::serve_client(&listener, &replies, &recorded));
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub(crate) const fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the manager thread and returns the recorded requests.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake manager thread panicked"))?
                .context("fake manager failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        replies: &[String],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Self::converse(stream, replies, requests),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // Nobody connected; the CLI gave up before dialling.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn converse(
        stream: TcpStream,
        replies: &[String],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        stream
            .set_nonblocking(false)
            .context("blocking client stream")?;
        let mut writer = stream.try_clone().context("clone stream")?;
        let mut reader = BufReader::new(stream);
        writer.write_all(GREETING.as_bytes())?;

        for reply in replies {
            let request = read_request(&mut reader)?;
            if request.is_empty() {
                break;
            }
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(request);
            writer.write_all(reply.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FakeManager {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Reads one action block, terminator included; empty at end of stream.
fn read_request(reader: &mut impl BufRead) -> Result<String> {
    let mut request = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).context("read request")? == 0 || line == "\r\n" {
            request.push_str(&line);
            return Ok(request);
        }
        request.push_str(&line);
    }
}
