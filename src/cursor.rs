//! The cursor: an allocation-free, immutable navigator into a [`Span`].
//!
//! Translated from `flexi_cursor_s` and the `flexi_cursor_*`/`flexi_buffer_open`
//! family in flexic.h / flexic.c, generalized to the newer `flexi_result_e`
//! surface per spec.md §9. See spec.md §4.2 for the full navigation contract.

use crate::error::{Error, Result};
use crate::span::Span;
use crate::wire::{self, Type, Width};

/// An immutable navigator into a document. Cheap to copy; reading through
/// a cursor never allocates.
///
/// `offset` is the index into the backing span's byte slice at which this
/// cursor's value (or, for composites, its length-prefixed payload) begins.
/// `width` is the element stride used to interpret that payload: for a
/// direct scalar it's the inline slot width, for a composite it's the
/// stride shared by every element/length field, and for `IndirectSint` /
/// `IndirectUint` / `IndirectFloat` it's the width of the dereferenced
/// value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    span: Span<'a>,
    offset: usize,
    ty: Type,
    width: usize,
}

fn get_bytes(data: &[u8], at: usize, len: usize) -> Result<&[u8]> {
    let end = at.checked_add(len).ok_or(Error::BadRead)?;
    data.get(at..end).ok_or(Error::BadRead)
}

/// Resolves a backward offset stored at `slot_at` (width `width` bytes) to
/// the byte index it refers to: `slot_at - value`, checked against
/// underflow. Per spec.md §9 "Backward offsets".
fn resolve_backward(data: &[u8], slot_at: usize, width: usize) -> Result<usize> {
    let raw = get_bytes(data, slot_at, width)?;
    let off = wire::read_u_le(raw, width);
    if off > i64::MAX as u64 {
        return Err(Error::BadRead);
    }
    slot_at.checked_sub(off as usize).ok_or(Error::BadRead)
}

fn typed_elem_type(ty: Type) -> Type {
    use Type::*;
    match ty {
        VectorSint | VectorSint2 | VectorSint3 | VectorSint4 => Sint,
        VectorUint | VectorUint2 | VectorUint3 | VectorUint4 => Uint,
        VectorFloat | VectorFloat2 | VectorFloat3 | VectorFloat4 => Float,
        VectorKey => Key,
        VectorBool => Bool,
        _ => unreachable!("typed_elem_type called on non-typed-vector"),
    }
}

/// Magnitude family a stored type belongs to, for the numeric conversion
/// matrix in spec.md §4.2.
enum Family {
    Sint,
    Uint,
    Float,
    Incompatible,
}

fn family_of(ty: Type) -> Family {
    match ty {
        Type::Sint | Type::IndirectSint => Family::Sint,
        Type::Uint | Type::IndirectUint | Type::Bool => Family::Uint,
        Type::Float | Type::IndirectFloat => Family::Float,
        _ => Family::Incompatible,
    }
}

fn f_to_i64(f: f64) -> Result<i64> {
    if !f.is_finite() {
        return Err(Error::Range);
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return Err(Error::Range);
    }
    Ok(t as i64)
}

fn f_to_u64(f: f64) -> Result<u64> {
    if !f.is_finite() {
        return Err(Error::Range);
    }
    let t = f.trunc();
    if t < 0.0 || t > u64::MAX as f64 {
        return Err(Error::Range);
    }
    Ok(t as u64)
}

impl<'a> Cursor<'a> {
    /// Opens a span and resolves its root value.
    ///
    /// Fails with [`Error::BadRead`] if the span is too short, the root
    /// stride byte isn't one of {1,2,4,8}, the root packed byte names an
    /// unknown type, or the root is indirect and its offset escapes the
    /// span.
    pub fn open(span: Span<'a>) -> Result<Cursor<'a>> {
        let data = span.bytes();
        let len = data.len();
        if len < 3 {
            return Err(Error::BadRead);
        }
        let root_stride = data[len - 1] as usize;
        if !matches!(root_stride, 1 | 2 | 4 | 8) {
            return Err(Error::BadRead);
        }
        if len < root_stride + 2 {
            return Err(Error::BadRead);
        }
        let root_packed = data[len - 2];
        let ty = wire::unpack_type(root_packed).ok_or(Error::BadRead)?;
        let slot_at = len - 2 - root_stride;

        if ty.is_direct() {
            return Ok(Cursor { span, offset: slot_at, ty, width: root_stride });
        }

        let target = resolve_backward(data, slot_at, root_stride)?;
        let width = wire::unpack_width(root_packed).bytes();
        Ok(Cursor { span, offset: target, ty, width })
    }

    /// The stored value's logical type.
    pub fn type_tag(&self) -> Type {
        self.ty
    }

    /// The element stride in bytes (see the struct-level docs for exactly
    /// what this means per type).
    pub fn width(&self) -> usize {
        self.width
    }

    fn raw(&self) -> Result<&'a [u8]> {
        get_bytes(self.span.bytes(), self.offset, self.width)
    }

    /// Length of a string/blob/vector/map's payload (element or byte
    /// count, per type). Zero for direct scalars and for [`Type::Key`]
    /// (which is NUL-terminated, not length-prefixed).
    ///
    /// Fixed-arity typed vectors (`VectorSint2`/`3`/`4` and friends) carry
    /// no length prefix on the wire — their count is implied by the type
    /// tag — so this returns the arity directly without touching the span.
    pub fn length(&self) -> Result<usize> {
        if let Some(arity) = self.ty.fixed_arity() {
            return Ok(arity);
        }
        if matches!(self.ty, Type::String | Type::Blob | Type::Map) || self.ty.is_vector() {
            let at = self.offset.checked_sub(self.width).ok_or(Error::BadRead)?;
            let bytes = get_bytes(self.span.bytes(), at, self.width)?;
            Ok(wire::read_u_le(bytes, self.width) as usize)
        } else {
            Ok(0)
        }
    }

    /// Reads the value as a boolean: true iff its numeric magnitude is
    /// nonzero.
    pub fn as_bool(&self) -> Result<bool> {
        let raw = self.raw()?;
        match family_of(self.ty) {
            Family::Sint => Ok(wire::read_i_le(raw, self.width) != 0),
            Family::Uint => Ok(wire::read_u_le(raw, self.width) != 0),
            Family::Float => Ok(wire::read_f_le(raw, self.width) != 0.0),
            Family::Incompatible => Err(Error::BadType),
        }
    }

    /// Reads the value as a signed integer, converting per spec.md §4.2.
    pub fn as_sint(&self) -> Result<i64> {
        let raw = self.raw()?;
        match family_of(self.ty) {
            Family::Sint => Ok(wire::read_i_le(raw, self.width)),
            Family::Uint => {
                let u = wire::read_u_le(raw, self.width);
                if u > i64::MAX as u64 {
                    Err(Error::Range)
                } else {
                    Ok(u as i64)
                }
            }
            Family::Float => f_to_i64(wire::read_f_le(raw, self.width)),
            Family::Incompatible => Err(Error::BadType),
        }
    }

    /// Reads the value as an unsigned integer, converting per spec.md §4.2.
    pub fn as_uint(&self) -> Result<u64> {
        let raw = self.raw()?;
        match family_of(self.ty) {
            Family::Sint => {
                let s = wire::read_i_le(raw, self.width);
                if s < 0 {
                    Err(Error::Range)
                } else {
                    Ok(s as u64)
                }
            }
            Family::Uint => Ok(wire::read_u_le(raw, self.width)),
            Family::Float => f_to_u64(wire::read_f_le(raw, self.width)),
            Family::Incompatible => Err(Error::BadType),
        }
    }

    /// Reads the value as `f32`, converting per spec.md §4.2.
    pub fn as_f32(&self) -> Result<f32> {
        let raw = self.raw()?;
        match family_of(self.ty) {
            Family::Sint => Ok(wire::read_i_le(raw, self.width) as f32),
            Family::Uint => Ok(wire::read_u_le(raw, self.width) as f32),
            Family::Float => {
                if self.width == 4 {
                    Ok(f32::from_le_bytes(raw[0..4].try_into().unwrap()))
                } else {
                    Ok(wire::read_f_le(raw, self.width) as f32)
                }
            }
            Family::Incompatible => Err(Error::BadType),
        }
    }

    /// Reads the value as `f64`, converting per spec.md §4.2.
    pub fn as_f64(&self) -> Result<f64> {
        let raw = self.raw()?;
        match family_of(self.ty) {
            Family::Sint => Ok(wire::read_i_le(raw, self.width) as f64),
            Family::Uint => Ok(wire::read_u_le(raw, self.width) as f64),
            Family::Float => Ok(wire::read_f_le(raw, self.width)),
            Family::Incompatible => Err(Error::BadType),
        }
    }

    /// Reads a [`Type::String`] value. The trailing NUL is present on the
    /// wire but not included in the returned slice.
    pub fn as_string(&self) -> Result<&'a str> {
        if self.ty != Type::String {
            return Err(Error::BadType);
        }
        let len = self.length()?;
        let bytes = get_bytes(self.span.bytes(), self.offset, len)?;
        std::str::from_utf8(bytes).map_err(|_| Error::BadRead)
    }

    /// Reads a [`Type::Blob`] value's raw bytes.
    pub fn as_blob(&self) -> Result<&'a [u8]> {
        if self.ty != Type::Blob {
            return Err(Error::BadType);
        }
        let len = self.length()?;
        get_bytes(self.span.bytes(), self.offset, len)
    }

    /// Reads a [`Type::Key`] value: a NUL-terminated identifier.
    pub fn as_key(&self) -> Result<&'a str> {
        if self.ty != Type::Key {
            return Err(Error::BadType);
        }
        let data = self.span.bytes();
        let start = self.offset;
        let mut end = start;
        loop {
            let b = *data.get(end).ok_or(Error::BadRead)?;
            if b == 0 {
                break;
            }
            end += 1;
        }
        std::str::from_utf8(&data[start..end]).map_err(|_| Error::BadRead)
    }

    /// Returns `(element type, element width, raw element bytes)` for a
    /// typed vector. Fails for heterogeneous [`Type::Vector`]/[`Type::Map`].
    pub fn typed_vector_data(&self) -> Result<(Type, usize, &'a [u8])> {
        if !self.ty.is_typed_vector() {
            return Err(Error::BadType);
        }
        let elem_type = typed_elem_type(self.ty);
        let count = self.length()?;
        let elem_width = self.width;
        let total = count.checked_mul(elem_width).ok_or(Error::BadRead)?;
        let data = get_bytes(self.span.bytes(), self.offset, total)?;
        Ok((elem_type, elem_width, data))
    }

    /// Returns the packed type-byte array of a heterogeneous
    /// [`Type::Vector`] or [`Type::Map`], one byte per element.
    pub fn vector_types(&self) -> Result<&'a [u8]> {
        if !self.ty.is_heterogeneous() {
            return Err(Error::BadType);
        }
        let count = self.length()?;
        let skip = count.checked_mul(self.width).ok_or(Error::BadRead)?;
        let at = self.offset.checked_add(skip).ok_or(Error::BadRead)?;
        get_bytes(self.span.bytes(), at, count)
    }

    fn seek_heterogeneous(&self, index: usize, len: usize) -> Result<Cursor<'a>> {
        let data = self.span.bytes();
        let stride = self.width;
        let skip = len.checked_mul(stride).ok_or(Error::BadRead)?;
        let types_at = self.offset.checked_add(skip).ok_or(Error::BadRead)?;
        let packed = *data.get(types_at + index).ok_or(Error::BadRead)?;
        let child_ty = wire::unpack_type(packed).ok_or(Error::BadRead)?;
        let slot_at = self
            .offset
            .checked_add(index.checked_mul(stride).ok_or(Error::BadRead)?)
            .ok_or(Error::BadRead)?;

        if child_ty.is_direct() {
            return Ok(Cursor { span: self.span, offset: slot_at, ty: child_ty, width: stride });
        }
        let target = resolve_backward(data, slot_at, stride)?;
        let width = wire::unpack_width(packed).bytes();
        Ok(Cursor { span: self.span, offset: target, ty: child_ty, width })
    }

    fn seek_typed(&self, index: usize) -> Result<Cursor<'a>> {
        let data = self.span.bytes();
        let elem_width = self.width;
        let slot_at = self
            .offset
            .checked_add(index.checked_mul(elem_width).ok_or(Error::BadRead)?)
            .ok_or(Error::BadRead)?;
        let elem_type = typed_elem_type(self.ty);

        if elem_type.is_direct() {
            return Ok(Cursor { span: self.span, offset: slot_at, ty: elem_type, width: elem_width });
        }
        // The only indirect typed-vector element kind is KEY: each slot
        // holds a backward offset to a NUL-terminated string.
        let target = resolve_backward(data, slot_at, elem_width)?;
        Ok(Cursor { span: self.span, offset: target, ty: elem_type, width: 1 })
    }

    /// Seeks to the child at `index` of any vector variant (heterogeneous
    /// or typed, including fixed-arity) or the value at `index` of a map's
    /// physical (sorted-by-key) order.
    pub fn seek_index(&self, index: usize) -> Result<Cursor<'a>> {
        let len = self.length()?;
        if index >= len {
            return Err(Error::BadRead);
        }
        if self.ty.is_heterogeneous() {
            self.seek_heterogeneous(index, len)
        } else if self.ty.is_typed_vector() {
            self.seek_typed(index)
        } else {
            Err(Error::BadType)
        }
    }

    fn keys_cursor(&self) -> Result<Cursor<'a>> {
        if self.ty != Type::Map {
            return Err(Error::BadType);
        }
        let data = self.span.bytes();
        let stride = self.width;
        let header_at = self.offset.checked_sub(3 * stride).ok_or(Error::BadRead)?;
        let keys_data_at = resolve_backward(data, header_at, stride)?;
        let stride_bytes = get_bytes(data, header_at + stride, stride)?;
        let keys_stride = wire::read_u_le(stride_bytes, stride) as usize;
        let keys_stride = Width::from_bytes(keys_stride).ok_or(Error::BadRead)?.bytes();
        Ok(Cursor { span: self.span, offset: keys_data_at, ty: Type::VectorKey, width: keys_stride })
    }

    /// The map key string at sorted position `index`.
    pub fn map_key_at_index(&self, index: usize) -> Result<&'a str> {
        let keys = self.keys_cursor()?;
        keys.seek_index(index)?.as_key()
    }

    /// Binary-searches a map's sorted keys vector for `key` and, on a
    /// match, returns the corresponding value cursor. Returns
    /// [`Error::NotFound`] (not treated as a structural failure) when
    /// absent.
    pub fn seek_key(&self, key: &str) -> Result<Cursor<'a>> {
        let len = self.length()?;
        let keys = self.keys_cursor()?;
        let mut lo = 0usize;
        let mut hi = len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = keys.seek_index(mid)?.as_key()?;
            match candidate.as_bytes().cmp(key.as_bytes()) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return self.seek_index(mid),
            }
        }
        Err(Error::NotFound)
    }

    /// Enumerates children in physical (on-wire) order. For a map, `key`
    /// is `Some` with the entry's key string; for a vector, `key` is
    /// `None`. Stops early (without error) if `f` returns `Ok(false)`.
    pub fn foreach<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(Option<&'a str>, Cursor<'a>) -> Result<bool>,
    {
        if !(self.ty.is_vector() || self.ty == Type::Map) {
            return Err(Error::BadType);
        }
        let len = self.length()?;
        for i in 0..len {
            let child = self.seek_index(i)?;
            let key = if self.ty == Type::Map { Some(self.map_key_at_index(i)?) } else { None };
            if !f(key, child)? {
                break;
            }
        }
        Ok(())
    }
}
