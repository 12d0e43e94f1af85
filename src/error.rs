//! Stable error taxonomy shared by the cursor and writer.
//!
//! Shaped after the teacher crate's leaf error types (`Lz4Error`,
//! `BlockDecompressError`): a plain `Copy` enum, no `thiserror`/`anyhow`
//! in the core library. See spec.md §6/§7 for the naming and policy this
//! mirrors.

use std::fmt;

/// An error returned by a cursor read or writer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Corrupt input, or `Cursor::open` failed to resolve a valid document.
    BadRead,
    /// The accessor called does not match the type family of the stored
    /// value (e.g. reading a string as an integer).
    BadType,
    /// A type-directed conversion produced a value outside the
    /// destination type's range.
    Range,
    /// `seek_map_key` found no entry for the requested key.
    NotFound,
    /// A writer's output-stream collaborator reported failure.
    BadWrite,
    /// The writer already holds a sticky error; this call was a no-op.
    FailSafe,
    /// An internal invariant was violated (a bug in this crate, not bad
    /// input).
    Internal,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::BadRead => "corrupt input or invalid document",
            Error::BadType => "accessor does not match the stored type",
            Error::Range => "value out of range for the requested conversion",
            Error::NotFound => "key not found",
            Error::BadWrite => "output stream write failed",
            Error::FailSafe => "writer is already in an error state",
            Error::Internal => "internal invariant violated",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
