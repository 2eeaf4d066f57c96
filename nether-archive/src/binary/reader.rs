//! Binary archive reader

use std::io::Read;

use byteorder::{NativeEndian, ReadBytesExt};
use tracing::{debug, warn};

use crate::archive::{Archive, Reader};
use crate::category::{CollectionKind, Role};
use crate::error::{ArchiveError, Result};
use crate::primitive::Primitive;
use crate::serializable::Serializable;

/// Reader for the binary format
#[derive(Debug)]
pub struct BinaryReader<R: Read> {
    reader: R,
    version: u32,
}

impl<R: Read> BinaryReader<R> {
    /// Open a reader, failing before any payload is consumed if the stored
    /// version differs from `expected_version`
    pub fn new(mut reader: R, expected_version: u32) -> Result<Self> {
        let found = reader.read_u32::<NativeEndian>()?;
        if found != expected_version {
            warn!(
                expected = expected_version,
                found, "binary archive version mismatch"
            );
            return Err(ArchiveError::VersionMismatch {
                expected: expected_version,
                found,
            });
        }
        debug!(version = found, "binary archive reader opened");
        Ok(Self {
            reader,
            version: found,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume the reader and return the underlying stream
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Archive for BinaryReader<R> {
    fn role(&self) -> Role {
        Role::Reader
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn transfer<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self> {
        self.read(value)
    }
}

impl<R: Read> Reader for BinaryReader<R> {
    fn read_primitive<P: Primitive>(&mut self) -> Result<P> {
        P::read_from(&mut self.reader)
    }

    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.reader.read_exact(bytes)?;
        Ok(())
    }

    fn begin_collection(&mut self, _kind: CollectionKind) -> Result<u32> {
        Ok(self.reader.read_u32::<NativeEndian>()?)
    }

    fn read_collection<E: Serializable>(
        &mut self,
        _kind: CollectionKind,
        elements: &mut [E],
    ) -> Result<()> {
        if elements.is_empty() {
            return Ok(());
        }
        if let Some(blob) = E::run_bytes_mut(elements) {
            return self.read_bytes(blob);
        }
        for element in elements.iter_mut() {
            self.read(element)?;
        }
        Ok(())
    }

    fn end_collection(&mut self, _kind: CollectionKind) -> Result<()> {
        Ok(())
    }

    fn read_composite<C: Serializable>(&mut self, value: &mut C) -> Result<()> {
        value.load(self)
    }
}
