//! Record codec
//!
//! The binary layout with an 8-byte `f64` timecode in front of every raw
//! write: `[u32 version]([f64 timecode][payload])*`. The version header is
//! not stamped. Collection counts are entries of their own, and a packed
//! primitive run is one entry even when it is empty.
//!
//! Writers stamp entries with their [`Recorder`](crate::Recorder)'s logical
//! time; readers expose one entry of lookahead so playback can wait until an
//! entry is due:
//!
//! ```no_run
//! # use nether_archive::{RecordReader, Reader};
//! # fn play(mut reader: RecordReader<std::fs::File>) -> nether_archive::Result<()> {
//! loop {
//!     reader.update();
//!     while reader.next_entry_due()? {
//!         let mut input = 0u32;
//!         reader.read(&mut input)?;
//!     }
//!     if reader.is_end()? {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod reader;
mod writer;

pub use reader::RecordReader;
pub use writer::RecordWriter;

/// Width of the timecode in front of every entry
pub const TIMECODE_SIZE: usize = std::mem::size_of::<f64>();

#[cfg(test)]
mod tests;
