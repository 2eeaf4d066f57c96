//! Fixed-width primitive values
//!
//! Binary codecs store primitives as their raw bytes in host order. The text
//! codec stores one token per value, using `Display` for numbers so floats
//! round-trip exactly. NaNs are written as `NaN:0x<bits>` to keep their sign
//! and payload.

use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ArchiveError, Result};

/// A value stored as a single fixed-width unit
pub trait Primitive: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// Name used in diagnostics
    const NAME: &'static str;

    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write the raw host-order bytes
    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()>;

    /// Read the raw host-order bytes
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;

    /// Text token for this value
    fn to_token(self) -> String;

    /// Parse a text token produced by [`Primitive::to_token`]
    fn from_token(token: &str) -> Result<Self>;
}

fn invalid<P: Primitive>(token: &str) -> ArchiveError {
    ArchiveError::InvalidValue {
        type_name: P::NAME,
        token: token.to_string(),
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $write:ident, $read:ident $(, $endian:ty)?;)*) => {
        $(
            impl Primitive for $ty {
                const NAME: &'static str = stringify!($ty);
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
                    writer.$write $(::<$endian>)? (self)
                }

                fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
                    Ok(reader.$read $(::<$endian>)? ()?)
                }

                fn to_token(self) -> String {
                    self.to_string()
                }

                fn from_token(token: &str) -> Result<Self> {
                    token.trim().parse().map_err(|_| invalid::<Self>(token))
                }
            }
        )*
    };
}

impl_primitive! {
    i8 => write_i8, read_i8;
    u8 => write_u8, read_u8;
    i16 => write_i16, read_i16, NativeEndian;
    u16 => write_u16, read_u16, NativeEndian;
    i32 => write_i32, read_i32, NativeEndian;
    u32 => write_u32, read_u32, NativeEndian;
    i64 => write_i64, read_i64, NativeEndian;
    u64 => write_u64, read_u64, NativeEndian;
    i128 => write_i128, read_i128, NativeEndian;
    u128 => write_u128, read_u128, NativeEndian;
}

macro_rules! impl_float_primitive {
    ($($ty:ty => $write:ident, $read:ident, $bits:ty;)*) => {
        $(
            impl Primitive for $ty {
                const NAME: &'static str = stringify!($ty);
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
                    writer.$write::<NativeEndian>(self)
                }

                fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
                    Ok(reader.$read::<NativeEndian>()?)
                }

                fn to_token(self) -> String {
                    if self.is_nan() {
                        format!("{NAN_PREFIX}{:#x}", self.to_bits())
                    } else {
                        self.to_string()
                    }
                }

                fn from_token(token: &str) -> Result<Self> {
                    let trimmed = token.trim();
                    let Some(bits) = trimmed.strip_prefix(NAN_PREFIX) else {
                        return trimmed.parse().map_err(|_| invalid::<Self>(token));
                    };
                    bits.strip_prefix("0x")
                        .and_then(|hex| <$bits>::from_str_radix(hex, 16).ok())
                        .map(<$ty>::from_bits)
                        .filter(|value| value.is_nan())
                        .ok_or_else(|| invalid::<Self>(token))
                }
            }
        )*
    };
}

const NAN_PREFIX: &str = "NaN:";

impl_float_primitive! {
    f32 => write_f32, read_f32, u32;
    f64 => write_f64, read_f64, u64;
}

impl Primitive for bool {
    const NAME: &'static str = "bool";
    const WIDTH: usize = 1;

    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self as u8)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(invalid::<Self>(&other.to_string())),
        }
    }

    fn to_token(self) -> String {
        self.to_string()
    }

    fn from_token(token: &str) -> Result<Self> {
        match token.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(invalid::<Self>(token)),
        }
    }
}

/// Characters are stored as their 32-bit scalar value
impl Primitive for char {
    const NAME: &'static str = "char";
    const WIDTH: usize = 4;

    fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<NativeEndian>(self as u32)
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let scalar = reader.read_u32::<NativeEndian>()?;
        char::from_u32(scalar).ok_or_else(|| invalid::<Self>(&format!("{scalar:#x}")))
    }

    fn to_token(self) -> String {
        format!("U+{:04X}", self as u32)
    }

    fn from_token(token: &str) -> Result<Self> {
        token
            .trim()
            .strip_prefix("U+")
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32)
            .ok_or_else(|| invalid::<Self>(token))
    }
}
