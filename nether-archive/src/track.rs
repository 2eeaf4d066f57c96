//! Fixed-rate frame capture
//!
//! A [`FrameTrack`] stores one opaque byte payload per frame. Capture writes
//! into the current frame and steps; playback reads the current frame and
//! steps. With a frame rate set, stepping only advances once enough clock
//! time has passed, so playback can run at the capture rate regardless of
//! how often it is driven.

use bytemuck::Pod;
use tracing::debug;

use crate::archive::{Reader, Writer};
use crate::clock::{Clock, PerformanceClock};
use crate::collections::read_sequence;
use crate::error::{ArchiveError, Result};
use crate::serializable::Serializable;

/// One captured frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Frame index at capture time
    pub timecode: u64,
    pub bytes: Vec<u8>,
}

impl Serializable for Frame {
    fn type_name() -> &'static str {
        "Frame"
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        writer
            .write(&self.timecode)?
            .write(&(self.bytes.len() as u64))?
            .write_bytes(&self.bytes)
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        let mut len = 0u64;
        reader.read(&mut self.timecode)?.read(&mut len)?;

        let allocation = || ArchiveError::Allocation {
            type_name: Self::type_name(),
        };
        let len = usize::try_from(len).map_err(|_| allocation())?;
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| allocation())?;
        bytes.resize(len, 0);

        reader.read_bytes(&mut bytes)?;
        self.bytes = bytes;
        Ok(())
    }
}

/// Frame-indexed capture buffer
pub struct FrameTrack<C: Clock = PerformanceClock> {
    frames: Vec<Frame>,
    index: usize,
    frame_time: Option<f64>,
    since_step: f64,
    clock: C,
}

impl FrameTrack<PerformanceClock> {
    pub fn new() -> Self {
        Self::with_clock(PerformanceClock::new())
    }
}

impl Default for FrameTrack<PerformanceClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameTrack<C> {
    /// Empty track holding one blank frame
    pub fn with_clock(clock: C) -> Self {
        Self {
            frames: vec![Frame::default()],
            index: 0,
            frame_time: None,
            since_step: 0.0,
            clock,
        }
    }

    /// Store `bytes` in the current frame
    ///
    /// Past the end, blank frames are appended up to the current index so
    /// every frame keeps its index as its timecode.
    pub fn set_data(&mut self, bytes: &[u8]) {
        while self.frames.len() <= self.index {
            self.frames.push(Frame {
                timecode: self.frames.len() as u64,
                bytes: Vec::new(),
            });
        }
        self.frames[self.index].bytes = bytes.to_vec();
    }

    /// Payload of the current frame; `None` once the track has ended
    pub fn data(&self) -> Option<&[u8]> {
        self.frames.get(self.index).map(|frame| frame.bytes.as_slice())
    }

    /// Current payload reinterpreted as a plain value
    ///
    /// `None` when the track has ended or the payload is not exactly the
    /// size of `P`.
    pub fn data_as<P: Pod>(&self) -> Option<P> {
        self.data()
            .and_then(|bytes| bytemuck::try_pod_read_unaligned(bytes).ok())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.since_step = 0.0;
    }

    /// Advance one frame, or with a frame rate set, once a frame's worth of
    /// clock time has accumulated
    pub fn step(&mut self) {
        let Some(frame_time) = self.frame_time else {
            self.index += 1;
            return;
        };

        self.since_step += self.clock.tick();
        if self.since_step > frame_time {
            self.index += 1;
            self.since_step = 0.0;
        }
    }

    pub fn is_end(&self) -> bool {
        self.index >= self.frames.len()
    }

    /// Pace stepping at `fps` frames per second; zero steps every call
    pub fn set_fps(&mut self, fps: u32) {
        self.frame_time = (fps > 0).then(|| 1.0 / fps as f64);
        debug!(fps, "frame track rate set");
    }
}

impl<C: Clock> Serializable for FrameTrack<C> {
    fn type_name() -> &'static str {
        "FrameTrack"
    }

    fn save<W: Writer>(&self, writer: &mut W) -> Result<()> {
        writer.write(&self.frames)?;
        Ok(())
    }

    fn load<R: Reader>(&mut self, reader: &mut R) -> Result<()> {
        self.frames = read_sequence(reader)?;
        self.restart();
        Ok(())
    }
}
