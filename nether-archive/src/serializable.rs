//! The `Serializable` capability and its built-in implementations

use crate::archive::{Reader, Writer};
use crate::category::{CollectionKind, TypeCategory};
use crate::collections::write_sequence;
use crate::error::{ArchiveError, Result};

/// A type that can be walked by any archive
///
/// `save` and `load` must visit the same fields in the same order. The
/// [`serializable!`](crate::serializable) macro generates both from a single
/// field list; types that need different bodies per direction implement them
/// by hand or go through an [`Adapter`](crate::split::Adapter).
pub trait Serializable: Sized {
    /// Encoding strategy, fixed per type
    const CATEGORY: TypeCategory = TypeCategory::Composite;

    /// Identifier written in front of composite bodies by the text codec
    ///
    /// Defaults to the unqualified Rust type name. Readers never interpret it.
    fn type_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()>;

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()>;

    /// Raw bytes of a contiguous run, for types whose runs are stored as one blob
    fn run_bytes(elements: &[Self]) -> Option<&[u8]> {
        let _ = elements;
        None
    }

    /// Mutable view used to fill a contiguous run from one blob
    fn run_bytes_mut(elements: &mut [Self]) -> Option<&mut [u8]> {
        let _ = elements;
        None
    }
}

/// Strip module paths from a fully qualified type name
///
/// `my_game::scene::Node<my_game::Mesh>` becomes `Node<my_game::Mesh>`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let head = full.find('<').unwrap_or(full.len());
    match full[..head].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

macro_rules! impl_serializable_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializable for $ty {
                const CATEGORY: TypeCategory = TypeCategory::Primitive;

                fn type_name() -> &'static str {
                    stringify!($ty)
                }

                fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
                    writer.write_primitive(*self)
                }

                fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
                    *self = reader.read_primitive()?;
                    Ok(())
                }

                fn run_bytes(elements: &[Self]) -> Option<&[u8]> {
                    Some(bytemuck::cast_slice(elements))
                }

                fn run_bytes_mut(elements: &mut [Self]) -> Option<&mut [u8]> {
                    Some(bytemuck::cast_slice_mut(elements))
                }
            }
        )*
    };
}

impl_serializable_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, f32, f64);

// bool and char have invalid bit patterns, so runs go element by element.
macro_rules! impl_serializable_checked {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializable for $ty {
                const CATEGORY: TypeCategory = TypeCategory::Primitive;

                fn type_name() -> &'static str {
                    stringify!($ty)
                }

                fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
                    writer.write_primitive(*self)
                }

                fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
                    *self = reader.read_primitive()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_serializable_checked!(bool, char);

/// Owned pointers take the pointer categories; reads allocate a fresh target
///
/// The target is a single `T`, allocated with `Box::new`. Running out of
/// memory there aborts like any other global allocation and is not reported
/// as [`ArchiveError::Allocation`](crate::ArchiveError::Allocation). Only
/// stream-sized buffers (collection bodies, frame payloads) are reserved
/// fallibly.
impl<T: Serializable + Default> Serializable for Box<T> {
    const CATEGORY: TypeCategory = TypeCategory::pointer_to(T::CATEGORY);

    fn type_name() -> &'static str {
        T::type_name()
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        writer.write(&**self)?;
        Ok(())
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        let mut target = Box::new(T::default());
        reader.read(&mut *target)?;
        *self = target;
        Ok(())
    }
}

/// Fixed-size arrays write their static length and check it on read
impl<T: Serializable, const N: usize> Serializable for [T; N] {
    const CATEGORY: TypeCategory = TypeCategory::Array;

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        write_sequence(writer, self.as_slice())
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        let found = reader.begin_collection(CollectionKind::Elements)?;
        let expected = u32::try_from(N).map_err(|_| ArchiveError::CollectionTooLarge(N))?;
        if found != expected {
            return Err(ArchiveError::LengthMismatch { expected, found });
        }
        reader.read_collection(CollectionKind::Elements, self.as_mut_slice())?;
        reader.end_collection(CollectionKind::Elements)
    }
}
