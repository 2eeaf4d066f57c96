//! The archive contract shared by every codec
//!
//! A codec implements six hooks for its direction: primitive, raw bytes,
//! the collection trio and composite. The generic [`Writer::write`] and
//! [`Reader::read`] entry points route a value to the right hook from its
//! [`TypeCategory`](crate::TypeCategory) and are never overridden.

use crate::category::{CollectionKind, Role, TypeCategory};
use crate::error::Result;
use crate::primitive::Primitive;
use crate::serializable::Serializable;

/// A serialization session bound to one stream, one role and one version
pub trait Archive: Sized {
    fn role(&self) -> Role;

    /// Protocol version stored in (or expected from) the stream header
    fn version(&self) -> u32;

    /// Write or read `value` depending on the archive role
    fn transfer<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self>;

    fn is_reader(&self) -> bool {
        self.role() == Role::Reader
    }

    fn is_writer(&self) -> bool {
        self.role() == Role::Writer
    }
}

/// Write side of a codec
pub trait Writer: Archive {
    fn write_primitive<P: Primitive>(&mut self, value: P) -> Result<()>;

    /// Raw, uninterpreted bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Open a collection envelope holding `count` elements
    fn begin_collection(&mut self, kind: CollectionKind, count: u32) -> Result<()>;

    fn write_collection<E: Serializable>(
        &mut self,
        kind: CollectionKind,
        elements: &[E],
    ) -> Result<()>;

    fn end_collection(&mut self, kind: CollectionKind) -> Result<()>;

    /// Bracket and emit the body of a structured value
    fn write_composite<C: Serializable>(&mut self, value: &C) -> Result<()>;

    /// Write any serializable value
    fn write<T: Serializable>(&mut self, value: &T) -> Result<&mut Self> {
        if T::CATEGORY == TypeCategory::Composite {
            self.write_composite(value)?;
        } else {
            value.save(self)?;
        }
        Ok(self)
    }
}

/// Read side of a codec
pub trait Reader: Archive {
    fn read_primitive<P: Primitive>(&mut self) -> Result<P>;

    /// Fill `bytes` with raw, uninterpreted bytes
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;

    /// Open a collection envelope and return its element count
    fn begin_collection(&mut self, kind: CollectionKind) -> Result<u32>;

    fn read_collection<E: Serializable>(
        &mut self,
        kind: CollectionKind,
        elements: &mut [E],
    ) -> Result<()>;

    fn end_collection(&mut self, kind: CollectionKind) -> Result<()>;

    /// Consume the bracket around a structured value and populate it
    fn read_composite<C: Serializable>(&mut self, value: &mut C) -> Result<()>;

    /// Read any serializable value in place
    fn read<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self> {
        if T::CATEGORY == TypeCategory::Composite {
            self.read_composite(value)?;
        } else {
            value.load(self)?;
        }
        Ok(self)
    }
}

/// Move `value` through `archive` in whichever direction the archive runs
pub fn serialize<A: Archive, T: Serializable>(archive: &mut A, value: &mut T) -> Result<()> {
    archive.transfer(value)?;
    Ok(())
}

/// Write `value` to `writer`
pub fn write<W: Writer, T: Serializable>(writer: &mut W, value: &T) -> Result<()> {
    writer.write(value)?;
    Ok(())
}

/// Read `value` from `reader`
pub fn read<R: Reader, T: Serializable>(reader: &mut R, value: &mut T) -> Result<()> {
    reader.read(value)?;
    Ok(())
}

/// Read a fresh value from `reader`
pub fn read_value<R: Reader, T: Serializable + Default>(reader: &mut R) -> Result<T> {
    let mut value = T::default();
    reader.read(&mut value)?;
    Ok(value)
}
