//! Receive loop that waits for a response while draining events.
//!
//! The protocol allows one outstanding action per connection and carries no
//! correlation id of its own: the next `response` block belongs to the
//! pending action. Anything else the manager sends in the meantime is
//! handled here before the response is handed back.
//!
//! The loop is a small state machine. Every block read is a transition:
//!
//! | block tag   | phase after        | outcome                          |
//! |-------------|--------------------|----------------------------------|
//! | `response`  | done               | block returned                   |
//! | `event`     | `DrainingEvents`   | handler invoked, keep reading    |
//! | `""`        | `AwaitingResponse` | returned if timeouts are allowed |
//! | other       | unchanged          | logged, keep reading             |

use tracing::{debug, trace};

use crate::block::Block;
use crate::error::TransportError;
use crate::events::{Endpoint, EventRegistry};
use crate::reader::read_block;
use crate::transport::Transport;

/// Log target for the receive loop.
pub(crate) const DISPATCH_TARGET: &str = "ami_client::dispatch";

/// Where the receive loop stands between two reads.
///
/// Diagnostics only: the phase is reported in trace records and never
/// changes which transition a block takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitPhase {
    /// Nothing but timeouts or unknown blocks seen since the last event.
    AwaitingResponse,
    /// The last block was an event that has been handled.
    DrainingEvents,
}

/// Classification of a block by its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    /// Empty block from a read timeout.
    Timeout,
    /// Unsolicited event.
    Event,
    /// Reply to the pending action.
    Response,
    /// Any other tag.
    Unknown,
}

impl BlockClass {
    /// Classifies `block` by its type tag.
    #[must_use]
    pub fn of(block: &Block) -> Self {
        match block.kind() {
            "" => Self::Timeout,
            "event" => Self::Event,
            "response" => Self::Response,
            _ => Self::Unknown,
        }
    }
}

enum Transition {
    Continue(WaitPhase),
    Complete(Block),
}

/// Drives one wait on a borrowed transport and registry.
pub struct Dispatcher<'a, T: ?Sized> {
    transport: &'a mut T,
    registry: &'a mut EventRegistry,
    origin: &'a Endpoint,
    phase: WaitPhase,
    events_handled: usize,
}

impl<'a, T> Dispatcher<'a, T>
where
    T: Transport + ?Sized,
{
    /// Prepares a wait. Nothing is read until [`Dispatcher::await_response`].
    pub const fn new(transport: &'a mut T, registry: &'a mut EventRegistry, origin: &'a Endpoint) -> Self {
        Self {
            transport,
            registry,
            origin,
            phase: WaitPhase::AwaitingResponse,
            events_handled: 0,
        }
    }

    /// Reads blocks until a response arrives.
    ///
    /// With `allow_timeout` set, a read timeout ends the wait with the empty
    /// block; otherwise timeouts are skipped. There is no limit on how many
    /// events are handled along the way.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; the caller must treat them as fatal to
    /// the connection.
    pub fn await_response(mut self, allow_timeout: bool) -> Result<Block, TransportError> {
        loop {
            let block = read_block(&mut *self.transport)?;
            match self.step(block, allow_timeout) {
                Transition::Complete(reply) => {
                    debug!(
                        target: DISPATCH_TARGET,
                        kind = reply.kind(),
                        events = self.events_handled,
                        "wait complete"
                    );
                    return Ok(reply);
                }
                Transition::Continue(phase) => self.phase = phase,
            }
        }
    }

    fn step(&mut self, block: Block, allow_timeout: bool) -> Transition {
        match BlockClass::of(&block) {
            BlockClass::Response => Transition::Complete(block),
            BlockClass::Timeout if allow_timeout => Transition::Complete(block),
            BlockClass::Timeout => {
                trace!(target: DISPATCH_TARGET, phase = ?self.phase, "read timeout, still waiting");
                Transition::Continue(WaitPhase::AwaitingResponse)
            }
            BlockClass::Event => {
                self.registry.dispatch(&block, self.origin);
                self.events_handled += 1;
                Transition::Continue(WaitPhase::DrainingEvents)
            }
            BlockClass::Unknown => {
                debug!(
                    target: DISPATCH_TARGET,
                    kind = block.kind(),
                    block = ?block,
                    "unhandled block from manager"
                );
                Transition::Continue(self.phase)
            }
        }
    }
}
