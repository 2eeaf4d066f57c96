//! Record archive reader

use std::io::{Read, Seek, SeekFrom};

use byteorder::{NativeEndian, ReadBytesExt};
use tracing::{debug, trace, warn};

use super::TIMECODE_SIZE;
use crate::archive::{Archive, Reader};
use crate::category::{CollectionKind, Role};
use crate::clock::{Clock, PerformanceClock};
use crate::config::RecordConfig;
use crate::error::{ArchiveError, Result};
use crate::primitive::Primitive;
use crate::recorder::Recorder;
use crate::serializable::Serializable;

/// Reader for the timestamped record format
pub struct RecordReader<R: Read + Seek, C: Clock = PerformanceClock> {
    reader: R,
    version: u32,
    recorder: Recorder<C>,
    last_timecode: f64,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Open a reader timed by the wall clock
    pub fn new(reader: R, expected_version: u32) -> Result<Self> {
        Self::with_clock(reader, expected_version, PerformanceClock::new())
    }
}

impl<R: Read + Seek, C: Clock> RecordReader<R, C> {
    /// Open a reader timed by `clock`, failing before any entry is consumed
    /// if the stored version differs from `expected_version`
    pub fn with_clock(mut reader: R, expected_version: u32, clock: C) -> Result<Self> {
        let found = reader.read_u32::<NativeEndian>()?;
        if found != expected_version {
            warn!(
                expected = expected_version,
                found, "record archive version mismatch"
            );
            return Err(ArchiveError::VersionMismatch {
                expected: expected_version,
                found,
            });
        }

        let mut recorder = Recorder::new(clock);
        recorder.play();
        debug!(version = found, "record archive reader opened");

        Ok(Self {
            reader,
            version: found,
            recorder,
            last_timecode: 0.0,
        })
    }

    /// Open a reader with the playback settings from `config`
    pub fn with_config(
        reader: R,
        expected_version: u32,
        clock: C,
        config: &RecordConfig,
    ) -> Result<Self> {
        let mut this = Self::with_clock(reader, expected_version, clock)?;
        this.set_speed(config.speed);
        if config.skip_to_first && !this.is_end()? {
            this.skip_time()?;
        }
        Ok(this)
    }

    /// Timecode of the next entry, without consuming it
    pub fn peek_timecode(&mut self) -> Result<f64> {
        let timecode = self.reader.read_f64::<NativeEndian>()?;
        self.reader
            .seek(SeekFrom::Current(-(TIMECODE_SIZE as i64)))?;
        Ok(timecode)
    }

    /// Whether every entry has been consumed; ends playback when it has
    pub fn is_end(&mut self) -> Result<bool> {
        let here = self.reader.stream_position()?;
        let end = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(here))?;

        let at_end = here >= end;
        if at_end && !self.recorder.is_ended() {
            self.recorder.finish();
        }
        Ok(at_end)
    }

    /// Snap logical time to the next entry's timecode
    pub fn skip_time(&mut self) -> Result<()> {
        let timecode = self.peek_timecode()?;
        trace!(from = self.recorder.time(), to = timecode, "record reader skipped");
        self.recorder.seek(timecode);
        Ok(())
    }

    /// Whether the next entry's timecode has passed on the logical clock
    pub fn next_entry_due(&mut self) -> Result<bool> {
        if self.is_end()? {
            return Ok(false);
        }
        Ok(self.peek_timecode()? < self.recorder.time())
    }

    /// Advance logical time by the wall time since the last update
    pub fn update(&mut self) {
        self.recorder.update();
    }

    pub fn time(&self) -> f64 {
        self.recorder.time()
    }

    pub fn pause(&mut self) {
        self.recorder.pause();
    }

    pub fn resume(&mut self) {
        self.recorder.resume();
    }

    /// Set playback speed, clamped to 0.1..=10.0
    pub fn set_speed(&mut self, speed: f32) {
        self.recorder.set_speed(speed);
    }

    /// Timecode of the most recently consumed entry
    pub fn last_timecode(&self) -> f64 {
        self.last_timecode
    }

    pub fn recorder(&self) -> &Recorder<C> {
        &self.recorder
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn consume_timecode(&mut self) -> Result<()> {
        self.last_timecode = self.reader.read_f64::<NativeEndian>()?;
        trace!(timecode = self.last_timecode, "record entry read");
        Ok(())
    }
}

impl<R: Read + Seek, C: Clock> Archive for RecordReader<R, C> {
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

impl<R: Read + Seek, C: Clock> Reader for RecordReader<R, C> {
    fn read_primitive<P: Primitive>(&mut self) -> Result<P> {
        self.consume_timecode()?;
        P::read_from(&mut self.reader)
    }

    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.consume_timecode()?;
        self.reader.read_exact(bytes)?;
        Ok(())
    }

    fn begin_collection(&mut self, _kind: CollectionKind) -> Result<u32> {
        self.consume_timecode()?;
        Ok(self.reader.read_u32::<NativeEndian>()?)
    }

    fn read_collection<E: Serializable>(
        &mut self,
        _kind: CollectionKind,
        elements: &mut [E],
    ) -> Result<()> {
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

    fn read_composite<T: Serializable>(&mut self, value: &mut T) -> Result<()> {
        value.load(self)
    }
}
