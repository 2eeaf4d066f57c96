//! Cross-codec round-trip tests.
//!
//! Every value written through a codec must come back identical when read
//! with the same codec and version, in the same order.

use std::io::Cursor;

use nether_archive::{
    ArchiveError, BinaryReader, BinaryWriter, ManualClock, Reader, RecordReader, RecordWriter,
    TextReader, TextWriter, WideString, Writer, serializable, serialize,
};

#[derive(Debug, Default, PartialEq)]
struct Leaf {
    a: i32,
}

serializable!(Leaf { a });

#[derive(Debug, Default, PartialEq)]
struct Branch {
    a: i32,
    b: Vec<Leaf>,
    samples: Vec<f64>,
    child: Box<Leaf>,
    name: String,
}

serializable!(Branch {
    a,
    b,
    samples,
    child,
    name
});

fn branch() -> Branch {
    Branch {
        a: 1337,
        b: (1..=5).map(|a| Leaf { a: a * 31 }).collect(),
        samples: vec![0.1, -2.75, 1e-12],
        child: Box::new(Leaf { a: -1 }),
        name: "root".to_string(),
    }
}

// =============================================================
// Basic values
// =============================================================

struct Basic {
    integer: i32,
    float: f32,
    double: f64,
    narrow: String,
    wide: WideString,
    list: Vec<i32>,
}

impl Basic {
    fn sample() -> Self {
        Self {
            integer: 4,
            float: 13.37,
            double: 12.34,
            narrow: "This is a test".to_string(),
            wide: WideString::from("This is just another test!"),
            list: vec![0, 1, 2, 3],
        }
    }

    fn empty() -> Self {
        Self {
            integer: 0,
            float: 0.0,
            double: 0.0,
            narrow: String::new(),
            wide: WideString::new(),
            list: Vec::new(),
        }
    }

    fn write_to<W: Writer>(&self, writer: &mut W) {
        writer
            .write(&self.integer)
            .unwrap()
            .write(&self.float)
            .unwrap()
            .write(&self.double)
            .unwrap()
            .write(&self.narrow)
            .unwrap()
            .write(&self.wide)
            .unwrap()
            .write(&self.list)
            .unwrap();
    }

    fn read_from<R: Reader>(reader: &mut R) -> Self {
        let mut value = Self::empty();
        reader
            .read(&mut value.integer)
            .unwrap()
            .read(&mut value.float)
            .unwrap()
            .read(&mut value.double)
            .unwrap()
            .read(&mut value.narrow)
            .unwrap()
            .read(&mut value.wide)
            .unwrap()
            .read(&mut value.list)
            .unwrap();
        value
    }

    fn assert_same(&self, other: &Self) {
        assert_eq!(self.integer, other.integer);
        assert_eq!(self.float.to_bits(), other.float.to_bits());
        assert_eq!(self.double.to_bits(), other.double.to_bits());
        assert_eq!(self.narrow, other.narrow);
        assert_eq!(self.wide, other.wide);
        assert_eq!(self.list, other.list);
    }
}

#[test]
fn test_basic_values_binary() {
    let expected = Basic::sample();
    let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
    expected.write_to(&mut writer);

    let mut reader = BinaryReader::new(Cursor::new(writer.into_inner()), 1).unwrap();
    Basic::read_from(&mut reader).assert_same(&expected);
}

#[test]
fn test_basic_values_text() {
    let expected = Basic::sample();
    let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
    expected.write_to(&mut writer);

    let mut reader = TextReader::new(Cursor::new(writer.into_inner()), 1).unwrap();
    Basic::read_from(&mut reader).assert_same(&expected);
}

#[test]
fn test_basic_values_record() {
    let expected = Basic::sample();
    let mut writer = RecordWriter::with_clock(Vec::new(), 1, ManualClock::new()).unwrap();
    expected.write_to(&mut writer);

    let mut reader =
        RecordReader::with_clock(Cursor::new(writer.into_inner()), 1, ManualClock::new()).unwrap();
    Basic::read_from(&mut reader).assert_same(&expected);
    assert!(reader.is_end().unwrap());
}

// =============================================================
// Version invariant
// =============================================================

#[test]
fn test_version_mismatch_every_codec() {
    let binary = BinaryWriter::new(Vec::new(), 1).unwrap().into_inner();
    let text = TextWriter::new(Vec::new(), 1).unwrap().into_inner();
    let record = RecordWriter::with_clock(Vec::new(), 1, ManualClock::new())
        .unwrap()
        .into_inner();

    let errors = [
        BinaryReader::new(Cursor::new(binary), 2).err(),
        TextReader::new(Cursor::new(text), 2).err(),
        RecordReader::with_clock(Cursor::new(record), 2, ManualClock::new()).err(),
    ];
    for err in errors {
        assert!(matches!(
            err,
            Some(ArchiveError::VersionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}

// =============================================================
// Collections
// =============================================================

#[test]
fn test_zero_length_sequence_has_no_payload() {
    let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
    writer.write(&Vec::<u64>::new()).unwrap();
    let bytes = writer.into_inner();
    assert_eq!(bytes.len(), 4 + 4);

    let mut values = vec![1u64, 2];
    BinaryReader::new(Cursor::new(bytes), 1)
        .unwrap()
        .read(&mut values)
        .unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_count_read_equals_count_written() {
    for len in [0usize, 1, 7, 300] {
        let values: Vec<u8> = (0..len).map(|i| i as u8).collect();

        let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
        writer.write(&values).unwrap();
        let mut restored: Vec<u8> = Vec::new();
        TextReader::new(Cursor::new(writer.into_inner()), 1)
            .unwrap()
            .read(&mut restored)
            .unwrap();
        assert_eq!(restored.len(), len);
        assert_eq!(restored, values);
    }
}

// =============================================================
// Nested composites
// =============================================================

#[test]
fn test_nested_composite_binary() {
    let value = branch();
    let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
    writer.write(&value).unwrap();

    let mut restored = Branch::default();
    BinaryReader::new(Cursor::new(writer.into_inner()), 1)
        .unwrap()
        .read(&mut restored)
        .unwrap();
    assert_eq!(restored, value);
}

#[test]
fn test_nested_composite_text() {
    let value = branch();
    let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
    writer.write(&value).unwrap();

    let mut restored = Branch::default();
    TextReader::new(Cursor::new(writer.into_inner()), 1)
        .unwrap()
        .read(&mut restored)
        .unwrap();
    assert_eq!(restored, value);
}

#[test]
fn test_list_of_composites_with_sequences() {
    let values = vec![branch(), Branch::default(), branch()];

    let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
    writer.write(&values).unwrap();
    let mut restored: Vec<Branch> = Vec::new();
    TextReader::new(Cursor::new(writer.into_inner()), 1)
        .unwrap()
        .read(&mut restored)
        .unwrap();
    assert_eq!(restored, values);
}

// =============================================================
// Symmetric transfer
// =============================================================

#[test]
fn test_serialize_runs_in_archive_direction() {
    let mut value = branch();
    let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
    serialize(&mut writer, &mut value).unwrap();

    let mut restored = Branch::default();
    let mut reader = BinaryReader::new(Cursor::new(writer.into_inner()), 1).unwrap();
    serialize(&mut reader, &mut restored).unwrap();
    assert_eq!(restored, value);
}

// =============================================================
// Idempotence
// =============================================================

#[test]
fn test_independent_writes_are_identical() {
    let value = branch();

    let binary = || {
        let mut writer = BinaryWriter::new(Vec::new(), 1).unwrap();
        writer.write(&value).unwrap();
        writer.into_inner()
    };
    assert_eq!(binary(), binary());

    let text = || {
        let mut writer = TextWriter::new(Vec::new(), 1).unwrap();
        writer.write(&value).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    };
    assert_eq!(text(), text());
}
