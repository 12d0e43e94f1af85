// FlexiC v1.0 — Rust port

pub mod cursor;
pub mod error;
pub mod parser;
pub mod span;
pub mod wire;
pub mod writer;

#[cfg(feature = "json")]
pub mod json;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level convenience re-exports for the most common entry points.
// These mirror the primary symbols from flexic.h.
// ─────────────────────────────────────────────────────────────────────────────

/// A borrowed view over input bytes. Equivalent to `flexi_buffer_s`.
pub use span::Span;
/// An allocation-free navigator into a document. Equivalent to `flexi_cursor_s`.
pub use cursor::Cursor;
/// The error type every fallible call in this crate returns.
pub use error::Error;
/// The result alias every fallible call in this crate returns.
pub use error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Wire primitives.
// ─────────────────────────────────────────────────────────────────────────────

/// The 6-bit stored-value type tag. Equivalent to `flexi_type_e`.
pub use wire::Type;
/// The 2-bit element width tag. Equivalent to `flexi_width_e`.
pub use wire::Width;

// ─────────────────────────────────────────────────────────────────────────────
// Parsing: a full-document depth-first walk. Equivalent to `flexi_reader_s`
// and `flexi_read`.
// ─────────────────────────────────────────────────────────────────────────────

/// Receives callbacks during a [`parse`] walk.
pub use parser::ParserSink;
/// Walks a document depth-first, dispatching to a [`ParserSink`].
pub use parser::parse;

// ─────────────────────────────────────────────────────────────────────────────
// Writing. Equivalent to `flexi_writer_s` and the `flexi_write_*` family.
// ─────────────────────────────────────────────────────────────────────────────

/// The staged document builder.
pub use writer::Writer;
/// One value awaiting composition into a vector, map, or the document root.
pub use writer::Slot;
/// The operand stack [`Writer`] pushes pending [`Slot`]s onto.
pub use writer::Stack;
/// The append-only byte sink [`Writer`] emits composed values into.
pub use writer::OutputStream;
/// A sorted keys vector produced by [`Writer::map_keys`].
pub use writer::KeySet;
/// A plain `Vec`-backed [`Stack`], the default collaborator most callers want.
pub use writer::default_stack::VecStack;
/// A plain `Vec<u8>`-backed [`OutputStream`], the default collaborator most
/// callers want.
pub use writer::default_stream::VecStream;

// ─────────────────────────────────────────────────────────────────────────────
// JSON stringification (`json` feature). Equivalent to the `flexi_to_json`
// helper exercised by tests/json.cpp.
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "json")]
pub use json::to_json_string;
#[cfg(feature = "json")]
pub use json::to_json_value;
