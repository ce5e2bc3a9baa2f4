//! Rendering of manager blocks on stdout.

use std::io::Write;

use ami_client::Block;

use crate::AppError;

/// How blocks are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// `Key: Value` lines followed by an empty line, as on the wire.
    Text,
    /// One JSON object per line, fields in wire order.
    Json,
}

impl OutputFormat {
    pub(crate) const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Writes one block to `writer`.
pub(crate) fn render_block<W>(writer: &mut W, block: &Block, format: OutputFormat) -> Result<(), AppError>
where
    W: Write,
{
    match format {
        OutputFormat::Text => {
            for (name, value) in block.iter() {
                writeln!(writer, "{name}: {value}").map_err(AppError::WriteOutput)?;
            }
            writeln!(writer).map_err(AppError::WriteOutput)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, block).map_err(AppError::SerialiseBlock)?;
            writeln!(writer).map_err(AppError::WriteOutput)?;
        }
    }
    writer.flush().map_err(AppError::WriteOutput)
}

/// Returns true for replies that report success.
pub(crate) fn is_success(reply: &Block) -> bool {
    matches!(reply.get("Response"), Some("Success" | "Follows"))
}
