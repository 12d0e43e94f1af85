//! Leaf value and key pushes: every `flexi_write_*` call in the source
//! that produces a single wire value rather than composing already-pushed
//! ones.

use crate::error::Result;
use crate::wire::{self, Type, Width};
use crate::writer::{OutputStream, Slot, Stack, Writer};

impl<'w, S: Stack, O: OutputStream> Writer<'w, S, O> {
    pub fn null(&mut self) -> Result<()> {
        self.run(|w| w.stack.push(Slot::direct(Type::Null, Width::W1, 0)))
    }

    pub fn bool(&mut self, v: bool) -> Result<()> {
        self.run(|w| w.stack.push(Slot::direct(Type::Bool, Width::W1, v as u64)))
    }

    pub fn sint(&mut self, v: i64) -> Result<()> {
        self.run(|w| {
            let width = wire::min_width_s(v);
            w.stack.push(Slot::direct(Type::Sint, width, v as u64))
        })
    }

    pub fn uint(&mut self, v: u64) -> Result<()> {
        self.run(|w| {
            let width = wire::min_width_u(v);
            w.stack.push(Slot::direct(Type::Uint, width, v))
        })
    }

    pub fn f32(&mut self, v: f32) -> Result<()> {
        self.run(|w| w.stack.push(Slot::direct(Type::Float, Width::W4, v.to_bits() as u64)))
    }

    pub fn f64(&mut self, v: f64) -> Result<()> {
        self.run(|w| w.stack.push(Slot::direct(Type::Float, Width::W8, v.to_bits())))
    }

    pub fn indirect_sint(&mut self, v: i64) -> Result<()> {
        self.run(|w| {
            let width = wire::min_width_s(v);
            let stride = width.bytes();
            let offset = w.stream.tell() as u64;
            w.stream.write(&(v as u64).to_le_bytes()[..stride])?;
            w.stack.push(Slot::indirect(Type::IndirectSint, width, offset))
        })
    }

    pub fn indirect_uint(&mut self, v: u64) -> Result<()> {
        self.run(|w| {
            let width = wire::min_width_u(v);
            let stride = width.bytes();
            let offset = w.stream.tell() as u64;
            w.stream.write(&v.to_le_bytes()[..stride])?;
            w.stack.push(Slot::indirect(Type::IndirectUint, width, offset))
        })
    }

    pub fn indirect_f32(&mut self, v: f32) -> Result<()> {
        self.run(|w| {
            let offset = w.stream.tell() as u64;
            w.stream.write(&v.to_le_bytes())?;
            w.stack.push(Slot::indirect(Type::IndirectFloat, Width::W4, offset))
        })
    }

    pub fn indirect_f64(&mut self, v: f64) -> Result<()> {
        self.run(|w| {
            let offset = w.stream.tell() as u64;
            w.stream.write(&v.to_le_bytes())?;
            w.stack.push(Slot::indirect(Type::IndirectFloat, Width::W8, offset))
        })
    }

    /// Pushes a map key. Identical key text is written to the stream only
    /// once; later calls reuse the earlier offset.
    pub fn key(&mut self, s: &str) -> Result<()> {
        self.run(|w| {
            let offset = match w.interner.get(s) {
                Some(off) => off,
                None => {
                    let off = w.stream.tell() as u64;
                    w.stream.write(s.as_bytes())?;
                    w.stream.write(&[0u8])?;
                    w.interner.insert(s, off);
                    off
                }
            };
            w.stack.push(Slot::indirect(Type::Key, Width::W1, offset))
        })
    }

    pub fn string(&mut self, s: &str) -> Result<()> {
        self.run(|w| {
            let bytes = s.as_bytes();
            let width = wire::min_width_u(bytes.len() as u64);
            let stride = width.bytes();
            w.stream.write(&(bytes.len() as u64).to_le_bytes()[..stride])?;
            let offset = w.stream.tell() as u64;
            w.stream.write(bytes)?;
            w.stream.write(&[0u8])?;
            w.stack.push(Slot::indirect(Type::String, width, offset))
        })
    }

    pub fn blob(&mut self, data: &[u8]) -> Result<()> {
        self.run(|w| {
            let width = wire::min_width_u(data.len() as u64);
            let stride = width.bytes();
            w.stream.write(&(data.len() as u64).to_le_bytes()[..stride])?;
            let offset = w.stream.tell() as u64;
            w.stream.write(data)?;
            w.stack.push(Slot::indirect(Type::Blob, width, offset))
        })
    }
}
