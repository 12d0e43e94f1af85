//! Wire primitives: type/width tags, the packed type+width byte, and the
//! little-endian word readers and minimum-width selectors built on top of
//! them.
//!
//! Translated from flexic.h / flexic.c (`flexi_type_e`, `flexi_width_e`,
//! `unpack_type`, `unpack_width`, `width_to_bytes`) and from the width
//! iteration described in spec.md §4.1.

/// Logical type of a stored value (6-bit wire code).
///
/// "Direct" variants (`Null`, `Sint`, `Uint`, `Float`, `Bool`) are stored
/// inline in the enclosing slot. Every other variant is "indirect": the
/// slot holds a backward byte offset to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
    Null = 0,
    Sint = 1,
    Uint = 2,
    Float = 3,
    Key = 4,
    String = 5,
    IndirectSint = 6,
    IndirectUint = 7,
    IndirectFloat = 8,
    Map = 9,
    Vector = 10,
    VectorSint = 11,
    VectorUint = 12,
    VectorFloat = 13,
    VectorKey = 14,
    VectorSint2 = 16,
    VectorUint2 = 17,
    VectorFloat2 = 18,
    VectorSint3 = 19,
    VectorUint3 = 20,
    VectorFloat3 = 21,
    VectorSint4 = 22,
    VectorUint4 = 23,
    VectorFloat4 = 24,
    Blob = 25,
    Bool = 26,
    VectorBool = 36,
}

impl Type {
    /// Decodes a 6-bit wire type code. `None` for reserved/unknown codes.
    pub fn from_code(code: u8) -> Option<Type> {
        use Type::*;
        Some(match code {
            0 => Null,
            1 => Sint,
            2 => Uint,
            3 => Float,
            4 => Key,
            5 => String,
            6 => IndirectSint,
            7 => IndirectUint,
            8 => IndirectFloat,
            9 => Map,
            10 => Vector,
            11 => VectorSint,
            12 => VectorUint,
            13 => VectorFloat,
            14 => VectorKey,
            16 => VectorSint2,
            17 => VectorUint2,
            18 => VectorFloat2,
            19 => VectorSint3,
            20 => VectorUint3,
            21 => VectorFloat3,
            22 => VectorSint4,
            23 => VectorUint4,
            24 => VectorFloat4,
            25 => Blob,
            26 => Bool,
            36 => VectorBool,
            _ => return None,
        })
    }

    /// True for values stored inline in the enclosing slot.
    pub fn is_direct(self) -> bool {
        matches!(self, Type::Null | Type::Sint | Type::Uint | Type::Float | Type::Bool)
    }

    /// True for values referenced through a backward byte offset.
    pub fn is_indirect(self) -> bool {
        !self.is_direct()
    }

    /// True for the heterogeneous composite kinds (`Vector`, `Map`).
    pub fn is_heterogeneous(self) -> bool {
        matches!(self, Type::Vector | Type::Map)
    }

    /// True for fixed-element-type vector kinds, including fixed-arity
    /// 2/3/4 variants and `VectorBool`/`VectorKey`.
    pub fn is_typed_vector(self) -> bool {
        matches!(
            self,
            Type::VectorSint
                | Type::VectorUint
                | Type::VectorFloat
                | Type::VectorKey
                | Type::VectorSint2
                | Type::VectorUint2
                | Type::VectorFloat2
                | Type::VectorSint3
                | Type::VectorUint3
                | Type::VectorFloat3
                | Type::VectorSint4
                | Type::VectorUint4
                | Type::VectorFloat4
                | Type::VectorBool
        )
    }

    /// True for any vector kind (heterogeneous or typed).
    pub fn is_vector(self) -> bool {
        self == Type::Vector || self.is_typed_vector()
    }

    /// The fixed arity of a fixed-size vector variant, if any (2, 3, or 4).
    pub fn fixed_arity(self) -> Option<usize> {
        match self {
            Type::VectorSint2 | Type::VectorUint2 | Type::VectorFloat2 => Some(2),
            Type::VectorSint3 | Type::VectorUint3 | Type::VectorFloat3 => Some(3),
            Type::VectorSint4 | Type::VectorUint4 | Type::VectorFloat4 => Some(4),
            _ => None,
        }
    }

    /// The base (arity-less) typed-vector variant for a signed-integer
    /// element type at the given arity (`None`/2/3/4 children).
    pub fn vector_sint(arity: Option<usize>) -> Type {
        match arity {
            Some(2) => Type::VectorSint2,
            Some(3) => Type::VectorSint3,
            Some(4) => Type::VectorSint4,
            _ => Type::VectorSint,
        }
    }

    /// As [`Type::vector_sint`], for unsigned-integer elements.
    pub fn vector_uint(arity: Option<usize>) -> Type {
        match arity {
            Some(2) => Type::VectorUint2,
            Some(3) => Type::VectorUint3,
            Some(4) => Type::VectorUint4,
            _ => Type::VectorUint,
        }
    }

    /// As [`Type::vector_sint`], for float elements.
    pub fn vector_float(arity: Option<usize>) -> Type {
        match arity {
            Some(2) => Type::VectorFloat2,
            Some(3) => Type::VectorFloat3,
            Some(4) => Type::VectorFloat4,
            _ => Type::VectorFloat,
        }
    }
}

/// Element width tag, packed into the low 2 bits of a wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Width {
    W1 = 0,
    W2 = 1,
    W4 = 2,
    W8 = 3,
}

impl Width {
    /// Decodes a 2-bit width code.
    pub fn from_code(code: u8) -> Width {
        match code & 0x03 {
            0 => Width::W1,
            1 => Width::W2,
            2 => Width::W4,
            _ => Width::W8,
        }
    }

    /// Byte size of this width: `2^code`.
    pub fn bytes(self) -> usize {
        1usize << (self as u8)
    }

    /// Maps a byte count (1/2/4/8) to its width tag.
    pub fn from_bytes(bytes: usize) -> Option<Width> {
        match bytes {
            1 => Some(Width::W1),
            2 => Some(Width::W2),
            4 => Some(Width::W4),
            8 => Some(Width::W8),
            _ => None,
        }
    }
}

/// Packs `(type, width)` into a single wire byte: `(type << 2) | width`.
pub fn pack(ty: Type, width: Width) -> u8 {
    ((ty as u8) << 2) | (width as u8)
}

/// Extracts the type from a packed wire byte.
pub fn unpack_type(packed: u8) -> Option<Type> {
    Type::from_code(packed >> 2)
}

/// Extracts the width from a packed wire byte.
pub fn unpack_width(packed: u8) -> Width {
    Width::from_code(packed)
}

/// Reads a little-endian unsigned integer of the given byte width from
/// `bytes` (which must be exactly `width` bytes long).
pub fn read_u_le(bytes: &[u8], width: usize) -> u64 {
    match width {
        1 => bytes[0] as u64,
        2 => u16::from_le_bytes([bytes[0], bytes[1]]) as u64,
        4 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
        8 => u64::from_le_bytes(bytes[0..8].try_into().unwrap()),
        _ => unreachable!("width must be 1/2/4/8"),
    }
}

/// Reads a little-endian signed integer of the given byte width, sign
/// extended to `i64`.
pub fn read_i_le(bytes: &[u8], width: usize) -> i64 {
    match width {
        1 => bytes[0] as i8 as i64,
        2 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        4 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        8 => i64::from_le_bytes(bytes[0..8].try_into().unwrap()),
        _ => unreachable!("width must be 1/2/4/8"),
    }
}

/// Reads a little-endian IEEE-754 float of width 4 or 8, widened to `f64`.
pub fn read_f_le(bytes: &[u8], width: usize) -> f64 {
    match width {
        4 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
        8 => f64::from_le_bytes(bytes[0..8].try_into().unwrap()),
        _ => unreachable!("float width must be 4 or 8"),
    }
}

/// Smallest width that can hold `v` as a two's-complement signed integer.
pub fn min_width_s(v: i64) -> Width {
    if v >= i8::MIN as i64 && v <= i8::MAX as i64 {
        Width::W1
    } else if v >= i16::MIN as i64 && v <= i16::MAX as i64 {
        Width::W2
    } else if v >= i32::MIN as i64 && v <= i32::MAX as i64 {
        Width::W4
    } else {
        Width::W8
    }
}

/// Smallest width that can hold `v` as an unsigned integer.
pub fn min_width_u(v: u64) -> Width {
    if v <= u8::MAX as u64 {
        Width::W1
    } else if v <= u16::MAX as u64 {
        Width::W2
    } else if v <= u32::MAX as u64 {
        Width::W4
    } else {
        Width::W8
    }
}

/// Smallest width whose unsigned range can hold a backward byte offset
/// `v`. Offsets are encoded unsigned but bounded by the distance from the
/// writing site, so this is the same ladder as [`min_width_u`].
pub fn min_width_off(v: u64) -> Width {
    min_width_u(v)
}
