//! Composing already-pushed slots into vectors, typed vectors, and maps.
//!
//! Every composite here picks its on-wire element stride by trying
//! widths starting at a caller-given hint and going up through 2, 4, 8
//! bytes, keeping the first one every member fits in — the same
//! fixed-point the source's `flexi_write_vector` and `flexi_write_map`
//! converge on, since a wider stride only ever pushes a backward offset's
//! target further away, never closer (spec.md §4.1/§4.6).

use crate::error::{Error, Result};
use crate::wire::{self, Type, Width};
use crate::writer::stack::Slot;
use crate::writer::{KeySet, OutputStream, Stack, Writer};

const WIDTHS: [Width; 4] = [Width::W1, Width::W2, Width::W4, Width::W8];

fn slot_type_byte(slot: &Slot) -> u8 {
    wire::pack(slot.ty, slot.width)
}

/// Widths from `WIDTHS` no narrower than `hint`, in ascending order —
/// the search space spec.md §4.6's "start with `stride = max(width_hint,
/// 1)`" reduces to once `Width`'s own floor is `W1`.
fn widths_from(hint: Width) -> impl Iterator<Item = Width> {
    WIDTHS.iter().copied().filter(move |w| w.bytes() >= hint.bytes())
}

/// Reads back the NUL-terminated key text written at `offset`, per
/// spec.md §4.6: "the writer dereferences the stored key offset to read
/// the bytes from its own output stream."
fn read_key_text<O: OutputStream>(stream: &O, offset: u64) -> Result<String> {
    let avail = (stream.tell() as u64).checked_sub(offset).ok_or(Error::Internal)?;
    let raw = stream.data_at(offset as usize, avail as usize)?;
    let nul = raw.iter().position(|&b| b == 0).ok_or(Error::Internal)?;
    std::str::from_utf8(&raw[..nul]).map(str::to_string).map_err(|_| Error::BadRead)
}

/// Tries to lay `slots` out at stride `stride` starting `elements_start`
/// bytes into the stream. `None` if any member doesn't fit.
fn try_layout(slots: &[Slot], elements_start: u64, stride: Width) -> Option<Vec<u64>> {
    let step = stride.bytes() as u64;
    let mut placed = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let place_at = elements_start + i as u64 * step;
        let value = if slot.ty.is_direct() {
            if slot.width.bytes() > stride.bytes() {
                return None;
            }
            slot.bits
        } else {
            let offset = place_at.checked_sub(slot.bits)?;
            if wire::min_width_off(offset).bytes() > stride.bytes() {
                return None;
            }
            offset
        };
        placed.push(value);
    }
    Some(placed)
}

/// Finds the narrowest stride every slot fits at, writes the element area
/// (and, if `heterogeneous`, one type byte per element after it), and
/// returns `(stride, elements_start)`.
fn place_elements<O: OutputStream>(
    stream: &mut O,
    slots: &[Slot],
    heterogeneous: bool,
    with_length_prefix: bool,
    hint: Width,
) -> Result<(Width, u64)> {
    let base = stream.tell() as u64;
    for stride in widths_from(hint) {
        let step = stride.bytes() as u64;
        let elements_start = base + if with_length_prefix { step } else { 0 };
        if let Some(values) = try_layout(slots, elements_start, stride) {
            if with_length_prefix {
                stream.write(&(slots.len() as u64).to_le_bytes()[..stride.bytes()])?;
            }
            for v in &values {
                stream.write(&v.to_le_bytes()[..stride.bytes()])?;
            }
            if heterogeneous {
                let type_bytes: Vec<u8> = slots.iter().map(slot_type_byte).collect();
                stream.write(&type_bytes)?;
            }
            return Ok((stride, elements_start));
        }
    }
    Err(Error::Internal)
}

impl<'w, S: Stack, O: OutputStream> Writer<'w, S, O> {
    /// Composes the top `n` stack slots (any mix of types) into a
    /// heterogeneous [`crate::wire::Type::Vector`]. `hint` is a floor on
    /// the element stride (spec.md §4.6): the search still widens past it
    /// if any element doesn't fit, but never narrows below it.
    pub fn vector(&mut self, n: usize, hint: Width) -> Result<()> {
        self.run(|w| {
            let slots = w.stack.pop_n(n)?;
            let (stride, data_ptr) = place_elements(w.stream, &slots, true, true, hint)?;
            w.stack.push(Slot::indirect(Type::Vector, stride, data_ptr))
        })
    }

    fn typed_vector_numeric(
        &mut self,
        n: usize,
        arity: Option<usize>,
        base: Type,
        hint: Width,
    ) -> Result<()> {
        self.run(|w| {
            let slots = w.stack.pop_n(n)?;
            if let Some(a) = arity {
                if a != n {
                    return Err(Error::BadWrite);
                }
            }
            let (stride, data_ptr) =
                place_elements(w.stream, &slots, false, arity.is_none(), hint)?;
            let ty = match base {
                Type::Sint => Type::vector_sint(arity),
                Type::Uint => Type::vector_uint(arity),
                Type::Float => Type::vector_float(arity),
                _ => unreachable!("typed_vector_numeric called with a non-numeric base"),
            };
            w.stack.push(Slot::indirect(ty, stride, data_ptr))
        })
    }

    /// Composes the top `n` signed-integer slots into a typed vector.
    /// `arity` selects a fixed 2/3/4-element variant with no length
    /// prefix; `None` writes the general length-prefixed form. `hint` is
    /// a floor on the element stride, as in [`Writer::vector`].
    pub fn typed_vector_sint(&mut self, n: usize, arity: Option<usize>, hint: Width) -> Result<()> {
        self.typed_vector_numeric(n, arity, Type::Sint, hint)
    }

    pub fn typed_vector_uint(&mut self, n: usize, arity: Option<usize>, hint: Width) -> Result<()> {
        self.typed_vector_numeric(n, arity, Type::Uint, hint)
    }

    pub fn typed_vector_flt(&mut self, n: usize, arity: Option<usize>, hint: Width) -> Result<()> {
        self.typed_vector_numeric(n, arity, Type::Float, hint)
    }

    /// Composes the top `n` bool slots into a [`Type::VectorBool`]; always
    /// one byte per element, always length-prefixed.
    pub fn typed_vector_bool(&mut self, n: usize) -> Result<()> {
        self.run(|w| {
            let slots = w.stack.pop_n(n)?;
            let (_, data_ptr) = place_elements(w.stream, &slots, false, true, Width::W1)?;
            w.stack.push(Slot::indirect(Type::VectorBool, Width::W1, data_ptr))
        })
    }

    /// Composes the top `n` key slots into a general-purpose
    /// [`Type::VectorKey`] (not sorted — unlike a map's own keys vector,
    /// membership order here is whatever the caller pushed).
    pub fn typed_vector_key(&mut self, n: usize, hint: Width) -> Result<()> {
        self.run(|w| {
            let slots = w.stack.pop_n(n)?;
            let (stride, data_ptr) = place_elements(w.stream, &slots, false, true, hint)?;
            w.stack.push(Slot::indirect(Type::VectorKey, stride, data_ptr))
        })
    }

    /// Pops the top `n` key slots (pushed via [`Writer::key`]), sorts them
    /// by text read back from the stream at each key's stored offset
    /// (spec.md §4.6), and writes the sorted keys vector. The returned
    /// [`KeySet`] must be passed to a [`Writer::map`] call whose `n`
    /// value slots were pushed in the *same order as the original `key`
    /// calls* — `map` applies the recorded permutation itself. `hint` is
    /// a floor on the keys vector's own element stride.
    pub fn map_keys(&mut self, n: usize, hint: Width) -> Result<KeySet> {
        self.run(|w| {
            let slots = w.stack.pop_n(n)?;
            let mut texts = Vec::with_capacity(n);
            for slot in &slots {
                texts.push(read_key_text(w.stream, slot.bits)?);
            }
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| texts[a].as_bytes().cmp(texts[b].as_bytes()));
            let sorted_slots: Vec<Slot> = order.iter().map(|&i| slots[i]).collect();
            let (stride, data_ptr) = place_elements(w.stream, &sorted_slots, false, true, hint)?;
            Ok(KeySet { offset: data_ptr, stride, count: n, perm: order })
        })
    }

    /// Pops the top `n` value slots (pushed in the same order as the keys
    /// that produced `keys`) and writes the map. `hint` is a floor on the
    /// map's own header/value stride.
    pub fn map(&mut self, keys: KeySet, n: usize, hint: Width) -> Result<()> {
        self.run(|w| {
            if keys.count != n {
                return Err(Error::BadWrite);
            }
            let values = w.stack.pop_n(n)?;
            let sorted: Vec<Slot> = keys.perm.iter().map(|&i| values[i]).collect();

            let header_at = w.stream.tell() as u64;
            let keys_offset = header_at.checked_sub(keys.offset).ok_or(Error::Internal)?;

            for stride in widths_from(hint) {
                if wire::min_width_off(keys_offset).bytes() > stride.bytes() {
                    continue;
                }
                let step = stride.bytes() as u64;
                let data_ptr = header_at + 3 * step;
                if let Some(values_at_stride) = try_layout(&sorted, data_ptr, stride) {
                    w.stream.write(&keys_offset.to_le_bytes()[..stride.bytes()])?;
                    w.stream
                        .write(&(keys.stride.bytes() as u64).to_le_bytes()[..stride.bytes()])?;
                    w.stream.write(&(n as u64).to_le_bytes()[..stride.bytes()])?;
                    for v in &values_at_stride {
                        w.stream.write(&v.to_le_bytes()[..stride.bytes()])?;
                    }
                    let type_bytes: Vec<u8> = sorted.iter().map(slot_type_byte).collect();
                    w.stream.write(&type_bytes)?;
                    return w.stack.push(Slot::indirect(Type::Map, stride, data_ptr));
                }
            }
            Err(Error::Internal)
        })
    }
}
