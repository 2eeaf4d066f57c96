//! Nether-Archive: versioned object-graph serialization for Nethercore
//!
//! Walks an in-memory object graph and writes or reads it through one of
//! three interchangeable codecs:
//!
//! | Codec | Layout | Used for |
//! |-------|--------|----------|
//! | [`binary`] | `[u32 version]` then raw host-order primitives and `[u32 count]` envelopes | asset blobs |
//! | [`text`] | indented, bracketed lines | authored scenes, diffable resources |
//! | [`record`] | binary with an `f64` timecode before every raw write | capture and replay |
//!
//! None of the formats are self-describing. A reader must replay the exact
//! sequence of calls the writer made, and a stream is only readable by an
//! archive expecting the same version number.
//!
//! # Dispatch
//!
//! Every [`Serializable`] type carries a compile-time [`TypeCategory`]:
//! primitives go straight to the codec, strings and owned pointers take the
//! pointer paths, arrays and `Vec`s become collection envelopes, and
//! everything else is a composite whose own body is walked recursively.
//! Graphs must be acyclic; nothing tracks identity.
//!
//! # Usage
//!
//! ```
//! use nether_archive::{BinaryReader, BinaryWriter, Reader, Writer};
//! use std::io::Cursor;
//!
//! let mut writer = BinaryWriter::new(Vec::new(), 1)?;
//! writer.write(&4i32)?.write(&String::from("This is a test"))?;
//!
//! let mut reader = BinaryReader::new(Cursor::new(writer.into_inner()), 1)?;
//! let (mut number, mut text) = (0i32, String::new());
//! reader.read(&mut number)?.read(&mut text)?;
//! assert_eq!((number, text.as_str()), (4, "This is a test"));
//! # Ok::<(), nether_archive::ArchiveError>(())
//! ```

pub mod archive;
pub mod binary;
pub mod category;
pub mod clock;
pub mod collections;
pub mod config;
pub mod error;
mod macros;
pub mod math;
pub mod primitive;
pub mod record;
pub mod recorder;
pub mod resource;
pub mod serializable;
pub mod split;
pub mod text;
pub mod track;

pub use archive::{Archive, Reader, Writer, read, read_value, serialize, write};
pub use binary::{BinaryReader, BinaryWriter};
pub use category::{CollectionKind, Role, TypeCategory};
pub use clock::{Clock, ManualClock, PerformanceClock, Timer};
pub use collections::{
    WideString, read_sequence, read_text, read_wide_text, write_sequence, write_text,
    write_wide_text,
};
pub use config::{ArchiveConfig, RecordConfig, TextConfig};
pub use error::{ArchiveError, Result};
pub use primitive::Primitive;
pub use record::{RecordReader, RecordWriter};
pub use recorder::{Recorder, RecorderState};
pub use resource::{ResourceFormat, load_resource, save_resource};
pub use serializable::Serializable;
pub use split::{Adapted, Adapter, read_with, split_serialize, write_with};
pub use text::{TextReader, TextWriter};
pub use track::{Frame, FrameTrack};
