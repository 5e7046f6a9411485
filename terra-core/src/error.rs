//! Error taxonomy (§7). Persistence and command faults get typed variants so
//! callers can match on them; everything else is logged in place and the
//! affected actor (chunk, entity, task) is dropped without unwinding the
//! tick, per §7's "propagation" rule.

use thiserror::Error;

/// Faults from region-file I/O (§4.2, §7 "Persistence faults").
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("region file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt region file: {detail}")]
    Corrupt { detail: String },
    #[error("chunk payload needs more than 255 sectors")]
    ChunkTooLarge,
}

/// Faults surfaced to the command dispatcher (§6, §7 "Invalid-input" and
/// "Authorization" faults). The dispatcher turns these into a chat message
/// rather than unwinding.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("bad argument: {0}")]
    BadArgument(String),
    #[error("permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Failed(String),
}
