//! Frame Clock
//!
//! [`Clock`] is the leaf time component of the viewer. It reads a
//! [`TimeSource`] once per frame and reports both the time since the clock
//! was created (`elapsed`) and the time since the previous tick (`delta`).
//!
//! Two sources are provided:
//!
//! - [`MonotonicTime`]: backed by `Instant`, immune to wall-clock adjustments.
//! - [`ManualTime`]: a shared, externally advanced counter. Hosts with a fixed
//!   time step and deterministic tests drive the clock through it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// A monotonic source of "time since an arbitrary epoch".
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Duration;
}

/// `Instant`-backed time source. The epoch is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    epoch: Instant,
}

impl MonotonicTime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced time source.
///
/// Clones share the same counter, so a test can keep one handle and give the
/// other to a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    nanos: Arc<AtomicU64>,
}

impl ManualTime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `step`, saturating at the largest representable
    /// time.
    pub fn advance(&self, step: Duration) {
        let step = u64::try_from(step.as_nanos()).unwrap_or(u64::MAX);
        // The closure always returns `Some`, so this never fails.
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |nanos| Some(nanos.saturating_add(step)));
    }

    /// Moves time forward by `seconds`. Negative or non-finite steps are
    /// ignored; steps too large for a [`Duration`] saturate.
    pub fn advance_secs(&self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.advance(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX));
        }
    }

    /// Jumps to an absolute time. Jumping backwards is allowed here; the
    /// [`Clock`] reading this source clamps it.
    pub fn set(&self, time: Duration) {
        let nanos = u64::try_from(time.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(nanos, Ordering::Release);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

/// Timing information produced by one [`Clock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time since the clock was created.
    pub elapsed: Duration,
    /// Time since the previous tick (zero on the first tick).
    pub delta: Duration,
    /// Number of ticks so far, including this one.
    pub frame: u64,
}

impl FrameTime {
    #[inline]
    #[must_use]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    #[inline]
    #[must_use]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Monotonic frame clock.
pub struct Clock {
    source: Box<dyn TimeSource>,
    start: Duration,
    last_tick: Duration,
    latest: FrameTime,
}

impl Clock {
    /// Creates a clock over the system's monotonic time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(MonotonicTime::new())
    }

    /// Creates a clock over an arbitrary time source. The current reading of
    /// `source` becomes this clock's epoch.
    #[must_use]
    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        let start = source.now();
        Self {
            source: Box::new(source),
            start,
            last_tick: start,
            latest: FrameTime::default(),
        }
    }

    /// Time since construction, without ticking.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.read().saturating_sub(self.start)
    }

    /// Advances the clock by one frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.read();
        let delta = if self.latest.frame == 0 {
            Duration::ZERO
        } else {
            now - self.last_tick
        };

        self.last_tick = now;
        self.latest = FrameTime {
            elapsed: now - self.start,
            delta,
            frame: self.latest.frame + 1,
        };
        self.latest
    }

    /// Re-baselines `delta` so the next tick does not include the time spent
    /// since the previous tick (e.g. while the frame loop was paused).
    /// `elapsed` is unaffected.
    pub fn reset_delta(&mut self) {
        self.last_tick = self.read();
    }

    /// `elapsed` as of the latest tick.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.latest.elapsed
    }

    /// `delta` as of the latest tick.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.latest.delta
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.latest.frame
    }

    #[inline]
    #[must_use]
    pub fn latest(&self) -> FrameTime {
        self.latest
    }

    /// Current source reading, never earlier than the last observed tick.
    fn read(&self) -> Duration {
        self.source.now().max(self.last_tick)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("start", &self.start)
            .field("last_tick", &self.last_tick)
            .field("latest", &self.latest)
            .finish_non_exhaustive()
    }
}
