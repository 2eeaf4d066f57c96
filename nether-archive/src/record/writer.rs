//! Record archive writer

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};
use tracing::{debug, trace};

use crate::archive::{Archive, Writer};
use crate::category::{CollectionKind, Role};
use crate::clock::{Clock, PerformanceClock};
use crate::error::Result;
use crate::primitive::Primitive;
use crate::recorder::Recorder;
use crate::serializable::Serializable;

/// Writer for the timestamped record format
pub struct RecordWriter<W: Write, C: Clock = PerformanceClock> {
    writer: W,
    version: u32,
    recorder: Recorder<C>,
    entries: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer stamped by the wall clock
    pub fn new(writer: W, version: u32) -> Result<Self> {
        Self::with_clock(writer, version, PerformanceClock::new())
    }
}

impl<W: Write, C: Clock> RecordWriter<W, C> {
    /// Create a writer stamped by `clock` and emit the version header
    pub fn with_clock(mut writer: W, version: u32, clock: C) -> Result<Self> {
        writer.write_u32::<NativeEndian>(version)?;

        let mut recorder = Recorder::new(clock);
        recorder.start_recording();
        debug!(version, "record archive writer opened");

        Ok(Self {
            writer,
            version,
            recorder,
            entries: 0,
        })
    }

    pub fn recorder(&self) -> &Recorder<C> {
        &self.recorder
    }

    /// Logical time the next entry would be stamped with, before its update
    pub fn time(&self) -> f64 {
        self.recorder.time()
    }

    /// Number of timestamped entries written so far
    pub fn entry_count(&self) -> u64 {
        self.entries
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn stamp(&mut self) -> Result<()> {
        self.recorder.update();
        let timecode = self.recorder.time();
        self.writer.write_f64::<NativeEndian>(timecode)?;
        self.entries += 1;
        trace!(timecode, entry = self.entries, "record entry written");
        Ok(())
    }
}

impl<W: Write, C: Clock> Archive for RecordWriter<W, C> {
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

impl<W: Write, C: Clock> Writer for RecordWriter<W, C> {
    fn write_primitive<P: Primitive>(&mut self, value: P) -> Result<()> {
        self.stamp()?;
        value.write_to(&mut self.writer)?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.stamp()?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn begin_collection(&mut self, _kind: CollectionKind, count: u32) -> Result<()> {
        self.stamp()?;
        self.writer.write_u32::<NativeEndian>(count)?;
        Ok(())
    }

    fn write_collection<E: Serializable>(
        &mut self,
        _kind: CollectionKind,
        elements: &[E],
    ) -> Result<()> {
        // A packed run is stamped even when empty.
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

    fn write_composite<T: Serializable>(&mut self, value: &T) -> Result<()> {
        value.save(self)
    }
}
