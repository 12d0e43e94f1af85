//! Full-document depth-first walk driven by a [`ParserSink`].
//!
//! Translated from `flexi_reader_s` / `flexi_read` in flexic.h, adapted
//! from a C function-pointer table to a Rust trait with default no-op
//! methods — callers override only the events they care about, the
//! "tagged-variant visitor" alternative spec.md §9 calls out as
//! equivalent to the source's callback table.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::wire::Type;

/// Receives callbacks during a [`parse`] walk. Every leaf and composite
/// "begin" event carries the enclosing map key, or `None` inside a vector
/// or at the document root.
///
/// All methods default to a no-op `Ok(())`; implement only what you need.
#[allow(unused_variables)]
pub trait ParserSink {
    fn null(&mut self, key: Option<&str>) -> Result<()> {
        Ok(())
    }
    fn sint(&mut self, key: Option<&str>, value: i64) -> Result<()> {
        Ok(())
    }
    fn uint(&mut self, key: Option<&str>, value: u64) -> Result<()> {
        Ok(())
    }
    fn f32(&mut self, key: Option<&str>, value: f32) -> Result<()> {
        Ok(())
    }
    fn f64(&mut self, key: Option<&str>, value: f64) -> Result<()> {
        Ok(())
    }
    fn boolean(&mut self, key: Option<&str>, value: bool) -> Result<()> {
        Ok(())
    }
    /// A standalone [`Type::Key`] leaf value (not the enclosing map key).
    fn key_value(&mut self, key: Option<&str>, value: &str) -> Result<()> {
        Ok(())
    }
    fn string(&mut self, key: Option<&str>, value: &str) -> Result<()> {
        Ok(())
    }
    fn blob(&mut self, key: Option<&str>, value: &[u8]) -> Result<()> {
        Ok(())
    }
    fn map_begin(&mut self, key: Option<&str>, len: usize) -> Result<()> {
        Ok(())
    }
    fn map_end(&mut self) -> Result<()> {
        Ok(())
    }
    fn vector_begin(&mut self, key: Option<&str>, len: usize) -> Result<()> {
        Ok(())
    }
    fn vector_end(&mut self) -> Result<()> {
        Ok(())
    }
    /// A typed vector: no per-element callback, just the raw payload.
    fn typed_vector(
        &mut self,
        key: Option<&str>,
        elem_type: Type,
        elem_width: usize,
        data: &[u8],
    ) -> Result<()> {
        Ok(())
    }
}

/// Walks `cursor` depth-first, dispatching to `sink`. Stops and returns the
/// first error any callback or any navigation step produces (spec.md §7
/// "surface and stop").
pub fn parse<S: ParserSink>(cursor: &Cursor<'_>, sink: &mut S) -> Result<()> {
    walk(cursor, None, sink)
}

fn walk<S: ParserSink>(cursor: &Cursor<'_>, key: Option<&str>, sink: &mut S) -> Result<()> {
    let ty = cursor.type_tag();
    match ty {
        Type::Null => sink.null(key),
        Type::Bool => sink.boolean(key, cursor.as_bool()?),
        Type::Sint | Type::IndirectSint => sink.sint(key, cursor.as_sint()?),
        Type::Uint | Type::IndirectUint => sink.uint(key, cursor.as_uint()?),
        Type::Float | Type::IndirectFloat => {
            if cursor.width() == 4 {
                sink.f32(key, cursor.as_f32()?)
            } else {
                sink.f64(key, cursor.as_f64()?)
            }
        }
        Type::Key => sink.key_value(key, cursor.as_key()?),
        Type::String => sink.string(key, cursor.as_string()?),
        Type::Blob => sink.blob(key, cursor.as_blob()?),
        Type::Map => {
            let len = cursor.length()?;
            sink.map_begin(key, len)?;
            for i in 0..len {
                let child_key = cursor.map_key_at_index(i)?;
                let child = cursor.seek_index(i)?;
                walk(&child, Some(child_key), sink)?;
            }
            sink.map_end()
        }
        Type::Vector => {
            let len = cursor.length()?;
            sink.vector_begin(key, len)?;
            for i in 0..len {
                let child = cursor.seek_index(i)?;
                walk(&child, None, sink)?;
            }
            sink.vector_end()
        }
        t if t.is_typed_vector() => {
            let (elem_type, elem_width, data) = cursor.typed_vector_data()?;
            sink.typed_vector(key, elem_type, elem_width, data)
        }
        _ => Err(Error::Internal),
    }
}
