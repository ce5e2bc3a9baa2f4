//! Reassembles protocol blocks from the transport's line stream.
//!
//! A block is a run of `Name: Value` lines closed by an empty line:
//! ```text
//! Response: Success\r\n
//! ActionID: 1\r\n
//! \r\n
//! ```
//! When the first field's value is `Follows`, the lines after it up to a
//! `--END ` sentinel are raw payload and collect under the `data` field.

use tracing::{debug, trace};

use crate::block::Block;
use crate::error::TransportError;
use crate::transport::Transport;

/// Log target for block parsing.
pub(crate) const READER_TARGET: &str = "ami_client::reader";

/// Value of a first field that announces a multi-line payload.
pub const FOLLOWS: &str = "Follows";

/// Prefix of the line that closes a `Follows` payload.
pub const FOLLOWS_TERMINATOR: &str = "--END ";

/// Field holding the concatenated `Follows` payload.
pub const DATA_FIELD: &str = "data";

/// Reads one block from `transport`.
///
/// A read timeout before any field arrives yields the empty block; a timeout
/// after some fields ends the block early, like an empty line would.
///
/// # Errors
///
/// Propagates transport failures, including [`TransportError::Closed`].
pub fn read_block<T>(transport: &mut T) -> Result<Block, TransportError>
where
    T: Transport + ?Sized,
{
    let mut block = Block::new();

    while let Some(raw) = transport.read_line()? {
        let line = trim_terminator(&raw);
        if line.is_empty() {
            break;
        }

        let Some((name, value)) = split_field(line) else {
            debug!(target: READER_TARGET, line, "skipping line without a field separator");
            continue;
        };

        if block.is_empty() {
            block.set_kind(name.to_lowercase());
            block.insert(name, value);
            if value == FOLLOWS {
                read_follows_payload(transport, &mut block)?;
            }
        } else {
            block.insert(name, value);
        }
    }

    trace!(target: READER_TARGET, kind = block.kind(), fields = block.len(), "block read");
    Ok(block)
}

/// Collects raw lines into [`DATA_FIELD`] until the terminator line.
///
/// Read timeouts inside a payload keep waiting for the rest of it.
fn read_follows_payload<T>(transport: &mut T, block: &mut Block) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
{
    block.insert(DATA_FIELD, "");
    loop {
        let Some(raw) = transport.read_line()? else {
            trace!(target: READER_TARGET, "read timeout inside payload");
            continue;
        };
        let line = trim_terminator(&raw);
        if line.starts_with(FOLLOWS_TERMINATOR) {
            return Ok(());
        }
        block.append(DATA_FIELD, line);
    }
}

fn trim_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Splits `Name: Value` at the first colon.
///
/// The value starts two characters after the colon, skipping the customary
/// space. A colon in first position does not count as a separator.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let separator = line.find(':').filter(|&index| index > 0)?;
    let (name, rest) = line.split_at(separator);
    let mut value = rest.chars();
    value.next();
    value.next();
    Some((name, value.as_str()))
}
