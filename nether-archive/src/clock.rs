//! Clocks and the logical timer used to stamp record entries

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of elapsed wall time
pub trait Clock {
    /// Seconds elapsed since the previous tick (or since creation)
    fn tick(&mut self) -> f64;
}

/// Monotonic high-resolution clock
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    last: Instant,
}

impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        elapsed
    }
}

/// Externally driven clock for deterministic capture and tests
///
/// Clones share the same time source, so one handle can drive a clock
/// owned by a writer or reader.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
    last: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move shared time forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn tick(&mut self) -> f64 {
        let now = self.now.get();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }
}

/// Pausable, speed-scaled logical time
#[derive(Debug, Clone)]
pub struct Timer {
    time: f64,
    scale: f64,
    paused: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            time: 0.0,
            scale: 1.0,
            paused: false,
        }
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `elapsed` wall seconds, scaled, unless paused
    pub fn notify(&mut self, elapsed: f64) {
        if !self.paused {
            self.time += elapsed * self.scale;
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}
