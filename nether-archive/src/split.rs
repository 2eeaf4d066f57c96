//! Split-serialize: external serializers for types that cannot implement
//! [`Serializable`] themselves
//!
//! An [`Adapter`] supplies a save and a load function for some foreign type.
//! [`split_serialize`] wraps the value so the archive's role picks which of
//! the two runs.

use std::marker::PhantomData;

use crate::archive::{Archive, Reader, Writer};
use crate::category::{Role, TypeCategory};
use crate::error::{ArchiveError, Result};
use crate::serializable::{Serializable, short_type_name};

/// Externally supplied save/load pair for `T`
///
/// An adapter only implementing one direction leaves the other at its
/// default, which fails with [`ArchiveError::RoleMismatch`].
pub trait Adapter<T> {
    const CATEGORY: TypeCategory = TypeCategory::Composite;

    fn type_name() -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }

    fn save<W: Writer>(value: &T, writer: &mut W) -> Result<()> {
        let _ = (value, writer);
        Err(ArchiveError::RoleMismatch { role: Role::Writer })
    }

    fn load<R: Reader>(value: &mut T, reader: &mut R) -> Result<()> {
        let _ = (value, reader);
        Err(ArchiveError::RoleMismatch { role: Role::Reader })
    }
}

/// A borrowed value paired with the adapter that serializes it
pub struct Adapted<'a, T, A: Adapter<T>> {
    value: &'a mut T,
    _adapter: PhantomData<A>,
}

impl<'a, T, A: Adapter<T>> Adapted<'a, T, A> {
    pub fn new(value: &'a mut T) -> Self {
        Self {
            value,
            _adapter: PhantomData,
        }
    }
}

impl<T, A: Adapter<T>> Serializable for Adapted<'_, T, A> {
    const CATEGORY: TypeCategory = A::CATEGORY;

    fn type_name() -> &'static str {
        A::type_name()
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        A::save(&*self.value, writer)
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        A::load(&mut *self.value, reader)
    }
}

/// Run the adapter's save or load for `value`, chosen by the archive role
pub fn split_serialize<A, T, Ad>(archive: &mut A, value: &mut T) -> Result<()>
where
    A: Archive,
    Ad: Adapter<T>,
{
    archive.transfer(&mut Adapted::<T, Ad>::new(value))?;
    Ok(())
}

/// Write `value` through an external adapter
pub fn write_with<W, T, Ad>(writer: &mut W, value: &mut T) -> Result<()>
where
    W: Writer,
    Ad: Adapter<T>,
{
    writer.write(&Adapted::<T, Ad>::new(value))?;
    Ok(())
}

/// Read `value` through an external adapter
pub fn read_with<R, T, Ad>(reader: &mut R, value: &mut T) -> Result<()>
where
    R: Reader,
    Ad: Adapter<T>,
{
    reader.read(&mut Adapted::<T, Ad>::new(value))?;
    Ok(())
}
