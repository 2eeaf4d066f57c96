//! Binary archive writer

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};
use tracing::debug;

use crate::archive::{Archive, Writer};
use crate::category::{CollectionKind, Role};
use crate::error::Result;
use crate::primitive::Primitive;
use crate::serializable::Serializable;

/// Writer for the binary format
pub struct BinaryWriter<W: Write> {
    writer: W,
    version: u32,
}

impl<W: Write> BinaryWriter<W> {
    /// Create a writer and emit the version header
    pub fn new(mut writer: W, version: u32) -> Result<Self> {
        writer.write_u32::<NativeEndian>(version)?;
        debug!(version, "binary archive writer opened");
        Ok(Self { writer, version })
    }

    /// Flush the underlying stream
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the writer and return the underlying stream
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Archive for BinaryWriter<W> {
    fn role(&self) -> Role {
        Role::Writer
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn transfer<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self> {
        self.write(&*value)
    }
}

impl<W: Write> Writer for BinaryWriter<W> {
    fn write_primitive<P: Primitive>(&mut self, value: P) -> Result<()> {
        value.write_to(&mut self.writer)?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn begin_collection(&mut self, _kind: CollectionKind, count: u32) -> Result<()> {
        self.writer.write_u32::<NativeEndian>(count)?;
        Ok(())
    }

    fn write_collection<E: Serializable>(
        &mut self,
        _kind: CollectionKind,
        elements: &[E],
    ) -> Result<()> {
        if elements.is_empty() {
            return Ok(());
        }
        match E::run_bytes(elements) {
            Some(blob) => self.write_bytes(blob),
            None => {
                for element in elements {
                    self.write(element)?;
                }
                Ok(())
            }
        }
    }

    fn end_collection(&mut self, _kind: CollectionKind) -> Result<()> {
        Ok(())
    }

    fn write_composite<C: Serializable>(&mut self, value: &C) -> Result<()> {
        value.save(self)
    }
}
