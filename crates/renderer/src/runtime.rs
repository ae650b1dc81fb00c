use std::time::{Duration, Instant};

/// Snapshot of the clock supplied to a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Seconds elapsed since the source was created.
    pub seconds: f64,
    /// Wall-clock instant the sample was taken at; drives FPS sampling.
    pub now: Instant,
}

/// Abstraction over where frame time originates from.
pub trait TimeSource {
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> TimeSample {
        let now = Instant::now();
        TimeSample {
            seconds: now.duration_since(self.origin).as_secs_f64(),
            now,
        }
    }
}

/// Time source that only moves when told to.
///
/// Each sample advances the clock by a fixed step, so a run of samples
/// simulates a steady frame rate without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    origin: Instant,
    elapsed: Duration,
    step: Duration,
}

impl SteppedTimeSource {
    /// Creates a source anchored at `origin` that advances by `step` per sample.
    pub fn new(origin: Instant, step: Duration) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            step,
        }
    }

    /// Moves the clock forward without producing a frame.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Current simulated instant.
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}

impl TimeSource for SteppedTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            seconds: self.elapsed.as_secs_f64(),
            now: self.now(),
        };
        self.elapsed += self.step;
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource>;
