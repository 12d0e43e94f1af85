//! Stringifies a document to JSON.
//!
//! Translated from the `flexi_to_json` helper exercised by
//! `tests/json.cpp` in the source: maps become objects, vectors and typed
//! vectors become arrays, blobs become base64 strings (JSON has no byte
//! string type), and a float that happens to be a `Type::Float` stored at
//! width 4 is still emitted as a JSON number, not specially tagged. A
//! non-finite float (NaN or infinity) has no JSON representation and
//! stringifying one fails with `Error::Range`.
//!
//! Built on `serde_json`/`base64`, the crates `ChainSafe/forest` reaches
//! for the same job, rather than hand-rolling string escaping.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map as JsonMap, Number, Value};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::parser::{parse, ParserSink};
use crate::wire::{self, Type};

enum Frame {
    Vector(Option<String>, Vec<Value>),
    Map(Option<String>, JsonMap<String, Value>),
}

#[derive(Default)]
struct JsonBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl JsonBuilder {
    fn emit(&mut self, key: Option<&str>, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Vector(_, v)) => v.push(value),
            Some(Frame::Map(_, m)) => {
                m.insert(key.ok_or(Error::Internal)?.to_string(), value);
            }
        }
        Ok(())
    }
}

/// JSON has no NaN/Infinity token; a non-finite float can't be
/// stringified and is rejected rather than silently coerced to `null`.
fn finite_number(f: f64) -> Result<Value> {
    Number::from_f64(f).map(Value::Number).ok_or(Error::Range)
}

impl ParserSink for JsonBuilder {
    fn null(&mut self, key: Option<&str>) -> Result<()> {
        self.emit(key, Value::Null)
    }
    fn sint(&mut self, key: Option<&str>, v: i64) -> Result<()> {
        self.emit(key, Value::Number(v.into()))
    }
    fn uint(&mut self, key: Option<&str>, v: u64) -> Result<()> {
        self.emit(key, Value::Number(v.into()))
    }
    fn f32(&mut self, key: Option<&str>, v: f32) -> Result<()> {
        let value = finite_number(v as f64)?;
        self.emit(key, value)
    }
    fn f64(&mut self, key: Option<&str>, v: f64) -> Result<()> {
        let value = finite_number(v)?;
        self.emit(key, value)
    }
    fn boolean(&mut self, key: Option<&str>, v: bool) -> Result<()> {
        self.emit(key, Value::Bool(v))
    }
    fn key_value(&mut self, key: Option<&str>, s: &str) -> Result<()> {
        self.emit(key, Value::String(s.to_string()))
    }
    fn string(&mut self, key: Option<&str>, s: &str) -> Result<()> {
        self.emit(key, Value::String(s.to_string()))
    }
    fn blob(&mut self, key: Option<&str>, data: &[u8]) -> Result<()> {
        self.emit(key, Value::String(BASE64.encode(data)))
    }
    fn map_begin(&mut self, key: Option<&str>, _len: usize) -> Result<()> {
        self.stack.push(Frame::Map(key.map(String::from), JsonMap::new()));
        Ok(())
    }
    fn map_end(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Map(key, m)) => self.emit(key.as_deref(), Value::Object(m)),
            _ => Err(Error::Internal),
        }
    }
    fn vector_begin(&mut self, key: Option<&str>, _len: usize) -> Result<()> {
        self.stack.push(Frame::Vector(key.map(String::from), Vec::new()));
        Ok(())
    }
    fn vector_end(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Vector(key, v)) => self.emit(key.as_deref(), Value::Array(v)),
            _ => Err(Error::Internal),
        }
    }
    fn typed_vector(
        &mut self,
        key: Option<&str>,
        elem_type: Type,
        elem_width: usize,
        data: &[u8],
    ) -> Result<()> {
        if elem_type == Type::Key {
            return Err(Error::BadType);
        }
        let count = data.len() / elem_width;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let bytes = &data[i * elem_width..(i + 1) * elem_width];
            let value = match elem_type {
                Type::Sint => Value::Number(wire::read_i_le(bytes, elem_width).into()),
                Type::Uint => Value::Number(wire::read_u_le(bytes, elem_width).into()),
                Type::Float => finite_number(wire::read_f_le(bytes, elem_width))?,
                Type::Bool => Value::Bool(wire::read_u_le(bytes, elem_width) != 0),
                _ => return Err(Error::BadType),
            };
            out.push(value);
        }
        self.emit(key, Value::Array(out))
    }
}

/// Stringifies the document at `cursor` to JSON.
pub fn to_json_string(cursor: &Cursor<'_>) -> Result<String> {
    let value = to_json_value(cursor)?;
    serde_json::to_string(&value).map_err(|_| Error::Internal)
}

/// Builds a `serde_json::Value` tree for the document at `cursor`.
pub fn to_json_value(cursor: &Cursor<'_>) -> Result<Value> {
    let mut builder = JsonBuilder::default();
    parse(cursor, &mut builder)?;
    builder.root.ok_or(Error::Internal)
}
