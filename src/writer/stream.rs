//! The append-only byte sink the writer emits composed values into.
//!
//! Translated from the raw output-buffer pointer threaded through
//! `flexi_write_*` in flexic.h, generalized to a trait (spec.md §5
//! "output stream") so callers can back it with a `Vec<u8>`, a memory-mapped
//! file, or anything else append-only and re-readable.

use crate::error::Result;

/// An append-only byte sink that can answer for its own already-written
/// bytes. The read-back is needed to sort a map's keys by the text already
/// written for them.
pub trait OutputStream {
    /// Appends `bytes` to the stream.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Current length of the stream in bytes; the offset the next `write`
    /// call will land at.
    fn tell(&self) -> usize;

    /// Reads back `len` bytes starting at `offset`, which must lie within
    /// bytes already written.
    fn data_at(&self, offset: usize, len: usize) -> Result<&[u8]>;
}
