//! Sequence and character-string helpers
//!
//! Every collection is stored as a count followed by its elements. Strings
//! use the character envelopes so the text codec can print them inline.

use std::fmt;

use crate::archive::{Reader, Writer};
use crate::category::{CollectionKind, TypeCategory};
use crate::error::{ArchiveError, Result};
use crate::serializable::Serializable;

fn envelope_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ArchiveError::CollectionTooLarge(len))
}

fn write_envelope<W: Writer, E: Serializable>(
    writer: &mut W,
    kind: CollectionKind,
    elements: &[E],
) -> Result<()> {
    let count = envelope_count(elements.len())?;
    writer.begin_collection(kind, count)?;
    writer.write_collection(kind, elements)?;
    writer.end_collection(kind)
}

fn read_envelope<R: Reader, E: Serializable + Default>(
    reader: &mut R,
    kind: CollectionKind,
) -> Result<Vec<E>> {
    let count = reader.begin_collection(kind)? as usize;

    let mut elements = Vec::new();
    elements
        .try_reserve_exact(count)
        .map_err(|_| ArchiveError::Allocation {
            type_name: E::type_name(),
        })?;
    elements.resize_with(count, E::default);

    reader.read_collection(kind, &mut elements)?;
    reader.end_collection(kind)?;
    Ok(elements)
}

/// Write a length-prefixed sequence
pub fn write_sequence<W: Writer, E: Serializable>(writer: &mut W, elements: &[E]) -> Result<()> {
    write_envelope(writer, CollectionKind::Elements, elements)
}

/// Read a length-prefixed sequence written by [`write_sequence`]
pub fn read_sequence<R: Reader, E: Serializable + Default>(reader: &mut R) -> Result<Vec<E>> {
    read_envelope(reader, CollectionKind::Elements)
}

/// Write a narrow string as its UTF-8 bytes
pub fn write_text<W: Writer>(writer: &mut W, text: &str) -> Result<()> {
    write_envelope(writer, CollectionKind::NarrowText, text.as_bytes())
}

/// Read a narrow string written by [`write_text`]
pub fn read_text<R: Reader>(reader: &mut R) -> Result<String> {
    let bytes: Vec<u8> = read_envelope(reader, CollectionKind::NarrowText)?;
    String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidText)
}

/// Write a wide string as its UTF-16 code units
pub fn write_wide_text<W: Writer>(writer: &mut W, units: &[u16]) -> Result<()> {
    write_envelope(writer, CollectionKind::WideText, units)
}

/// Read the UTF-16 code units written by [`write_wide_text`]
pub fn read_wide_text<R: Reader>(reader: &mut R) -> Result<Vec<u16>> {
    read_envelope(reader, CollectionKind::WideText)
}

impl<T: Serializable + Default> Serializable for Vec<T> {
    const CATEGORY: TypeCategory = TypeCategory::Array;

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        write_sequence(writer, self)
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        *self = read_sequence(reader)?;
        Ok(())
    }
}

/// Narrow character strings
impl Serializable for String {
    const CATEGORY: TypeCategory = TypeCategory::PrimitivePointer;

    fn type_name() -> &'static str {
        "String"
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        write_text(writer, self)
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        *self = read_text(reader)?;
        Ok(())
    }
}

fn check_utf16(units: &[u16]) -> Result<()> {
    if char::decode_utf16(units.iter().copied()).any(|c| c.is_err()) {
        return Err(ArchiveError::InvalidText);
    }
    Ok(())
}

/// A wide character string held as well-formed UTF-16 code units
///
/// Unpaired surrogates are rejected on construction and on load, so every
/// value prints as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString(Vec<u16>);

impl WideString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap UTF-16 code units, failing with
    /// [`ArchiveError::InvalidText`] on unpaired surrogates
    pub fn from_units(units: Vec<u16>) -> Result<Self> {
        check_utf16(&units)?;
        Ok(Self(units))
    }

    pub fn units(&self) -> &[u16] {
        &self.0
    }

    /// Number of UTF-16 code units
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for WideString {
    fn from(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.0.iter().copied()) {
            write!(f, "{}", c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl Serializable for WideString {
    const CATEGORY: TypeCategory = TypeCategory::PrimitivePointer;

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        write_wide_text(writer, &self.0)
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        *self = Self::from_units(read_wide_text(reader)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{BinaryReader, BinaryWriter};
    use crate::text::{TextReader, TextWriter};
    use std::io::Cursor;

    /// Element so large that no stream count can be reserved for it
    #[cfg(target_pointer_width = "64")]
    #[allow(dead_code)]
    struct Huge([u8; 1 << 32]);

    #[cfg(target_pointer_width = "64")]
    impl Default for Huge {
        fn default() -> Self {
            unreachable!("never constructed")
        }
    }

    #[cfg(target_pointer_width = "64")]
    impl Serializable for Huge {
        fn type_name() -> &'static str {
            "Huge"
        }

        fn save<W: Writer>(&self, _writer: &mut W) -> Result<()> {
            Ok(())
        }

        fn load<R: Reader>(&mut self, _reader: &mut R) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_wide_string_conversions() {
        let wide = WideString::from("Grüße 😀");
        assert_eq!(wide.len(), 8);
        assert_eq!(wide.to_string(), "Grüße 😀");
        assert_eq!(
            WideString::from_units(wide.units().to_vec()).unwrap(),
            wide
        );
    }

    #[test]
    fn test_unpaired_surrogate_is_rejected() {
        assert!(matches!(
            WideString::from_units(vec![0x41, 0xD800]),
            Err(ArchiveError::InvalidText)
        ));
        assert!(matches!(
            WideString::from_units(vec![0xDC00, 0x41]),
            Err(ArchiveError::InvalidText)
        ));
    }

    #[test]
    fn test_unpaired_surrogate_in_stream_is_rejected() {
        let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
        write_wide_text(&mut writer, &[0x41, 0xD800]).unwrap();

        let mut wide = WideString::new();
        let err = BinaryReader::new(Cursor::new(writer.into_inner()), 1)
            .unwrap()
            .read(&mut wide)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidText));
    }

    #[test]
    fn test_surrogate_pairs_print_as_text() {
        let wide = WideString::from_units(vec![0x41, 0xD83D, 0xDE00]).unwrap();
        let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
        writer.write(&wide).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "Version 1\n[String 3 \"A😀\"]\n");

        let mut restored = WideString::new();
        TextReader::new(Cursor::new(text), 1)
            .unwrap()
            .read(&mut restored)
            .unwrap();
        assert_eq!(restored, wide);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_count_is_an_allocation_error() {
        let mut bytes = 1u32.to_ne_bytes().to_vec();
        bytes.extend_from_slice(&u32::MAX.to_ne_bytes());

        let mut values: Vec<Huge> = Vec::new();
        let err = BinaryReader::new(Cursor::new(bytes), 1)
            .unwrap()
            .read(&mut values)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Allocation { type_name: "Huge" }));
        assert!(values.is_empty());
    }

    #[test]
    fn test_categories() {
        assert_eq!(String::CATEGORY, TypeCategory::PrimitivePointer);
        assert_eq!(WideString::CATEGORY, TypeCategory::PrimitivePointer);
        assert_eq!(<Vec<u8>>::CATEGORY, TypeCategory::Array);
    }
}
