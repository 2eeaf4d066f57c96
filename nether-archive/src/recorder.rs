//! Timed capture and playback control
//!
//! A [`Recorder`] pairs a free-running [`Clock`] with a pausable, speed-scaled
//! [`Timer`]. Record writers stamp each entry with the recorder's logical
//! time; record readers compare entry timecodes against it to decide when the
//! next entry is due.

use tracing::debug;

use crate::clock::{Clock, PerformanceClock, Timer};

/// Playback speed bounds
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 10.0;

/// Recorder lifecycle
///
/// Capture runs `Idle -> Recording` and stays there. Playback runs
/// `Idle -> Playing -> (Paused <-> Playing) -> Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Playing,
    Paused,
    Ended,
}

/// Clock, timer and lifecycle state for a capture or playback session
#[derive(Debug)]
pub struct Recorder<C: Clock = PerformanceClock> {
    clock: C,
    timer: Timer,
    state: RecorderState,
    speed: f32,
}

impl Recorder<PerformanceClock> {
    /// Recorder driven by the monotonic wall clock
    pub fn realtime() -> Self {
        Self::new(PerformanceClock::new())
    }
}

impl<C: Clock> Recorder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            timer: Timer::new(),
            state: RecorderState::Idle,
            speed: 1.0,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    fn transition(&mut self, next: RecorderState) {
        debug!(from = ?self.state, to = ?next, "recorder state change");
        self.state = next;
    }

    /// Begin capture; only valid from `Idle`
    pub fn start_recording(&mut self) {
        if self.state == RecorderState::Idle {
            self.clock.tick();
            self.transition(RecorderState::Recording);
        }
    }

    /// Begin playback; only valid from `Idle`
    pub fn play(&mut self) {
        if self.state == RecorderState::Idle {
            self.clock.tick();
            self.transition(RecorderState::Playing);
        }
    }

    /// Stop logical time during playback
    pub fn pause(&mut self) {
        if self.state == RecorderState::Playing {
            self.timer.pause();
            self.transition(RecorderState::Paused);
        }
    }

    /// Continue logical time after [`Recorder::pause`]
    pub fn resume(&mut self) {
        if self.state == RecorderState::Paused {
            self.timer.resume();
            self.transition(RecorderState::Playing);
        }
    }

    /// Mark playback as finished
    pub fn finish(&mut self) {
        if matches!(self.state, RecorderState::Playing | RecorderState::Paused) {
            self.transition(RecorderState::Ended);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.state == RecorderState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == RecorderState::Paused
    }

    pub fn is_ended(&self) -> bool {
        self.state == RecorderState::Ended
    }

    /// Set the playback speed multiplier (1.0 = normal), clamped to 0.1..=10.0
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.timer.set_scale(self.speed as f64);
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advance logical time by the wall time elapsed since the last update
    pub fn update(&mut self) {
        let elapsed = self.clock.tick();
        if self.state != RecorderState::Ended {
            self.timer.notify(elapsed);
        }
    }

    /// Logical elapsed time in seconds
    pub fn time(&self) -> f64 {
        self.timer.time()
    }

    /// Jump logical time to `time`
    pub fn seek(&mut self, time: f64) {
        self.timer.set_time(time);
    }
}
