//! Declarative helper for the symmetric serialize contract

/// Implement [`Serializable`](crate::Serializable) from one field list
///
/// The same list drives both `save` and `load`, so the write and read
/// traversal orders cannot drift apart. The composite name written by the
/// text codec is the type as spelled in the invocation.
///
/// ```
/// use nether_archive::{BinaryReader, BinaryWriter, Reader, Writer, serializable};
/// use std::io::Cursor;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Probe {
///     position: [f32; 3],
///     radius: f32,
///     label: String,
/// }
///
/// serializable!(Probe { position, radius, label });
///
/// let probe = Probe { position: [1.0, 2.0, 3.0], radius: 4.5, label: "sky".into() };
/// let mut writer = BinaryWriter::new(Vec::new(), 1)?;
/// writer.write(&probe)?;
///
/// let mut restored = Probe::default();
/// let mut reader = BinaryReader::new(Cursor::new(writer.into_inner()), 1)?;
/// reader.read(&mut restored)?;
/// assert_eq!(restored, probe);
/// # Ok::<(), nether_archive::ArchiveError>(())
/// ```
#[macro_export]
macro_rules! serializable {
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::Serializable for $ty {
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            #[allow(unused_variables)]
            fn save<W: $crate::Writer>(&self, writer: &mut W) -> $crate::Result<()> {
                $( $crate::Writer::write(writer, &self.$field)?; )*
                Ok(())
            }

            #[allow(unused_variables)]
            fn load<R: $crate::Reader>(&mut self, reader: &mut R) -> $crate::Result<()> {
                $( $crate::Reader::read(reader, &mut self.$field)?; )*
                Ok(())
            }
        }
    };
}
