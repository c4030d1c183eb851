//! Driver-side clock for ticking explosions.
//!
//! The engine only needs a monotonically non-decreasing elapsed time per
//! tick. [`AnimationClock`] provides one, either from the wall clock or
//! stepped manually for offline rendering and tests.
//!
//! # Example
//!
//! ```ignore
//! use shatterfield::time::AnimationClock;
//!
//! let mut clock = AnimationClock::new();
//! clock.set_fixed_step(Some(Duration::from_millis(16)));
//!
//! // In the redraw loop:
//! let elapsed = clock.update();
//! engine.tick(elapsed);
//! ```

use std::time::{Duration, Instant};

/// Elapsed-time source for an animation loop.
#[derive(Debug)]
pub struct AnimationClock {
    /// Wall-clock instant of the last update.
    last_update: Instant,
    /// Accumulated animation time.
    elapsed: Duration,
    /// Time added by the last update.
    delta: Duration,
    /// Updates since start.
    frame_count: u64,
    paused: bool,
    /// Step added per update instead of wall-clock time (offline rendering).
    fixed_step: Option<Duration>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl AnimationClock {
    /// Create a clock at zero elapsed time.
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            paused: false,
            fixed_step: None,
            time_scale: 1.0,
        }
    }

    /// Clock that advances by exactly `step` on every update.
    pub fn fixed(step: Duration) -> Self {
        let mut clock = Self::new();
        clock.fixed_step = Some(step);
        clock
    }

    /// Advance by the wall-clock time since the last update (or the fixed
    /// step) and return the new elapsed time. Call once per frame.
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let raw = now.duration_since(self.last_update);
        self.last_update = now;
        self.advance(self.fixed_step.unwrap_or(raw))
    }

    /// Advance by `delta`, scaled, and return the new elapsed time.
    ///
    /// While paused nothing is added, so elapsed time never goes backwards.
    pub fn advance(&mut self, delta: Duration) -> Duration {
        self.delta = if self.paused {
            Duration::ZERO
        } else if self.time_scale == 1.0 {
            delta
        } else {
            delta.mul_f64(f64::from(self.time_scale))
        };
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.elapsed
    }

    /// Total animation time.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time added by the last update.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Number of updates since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_update = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed step per update instead of wall-clock time.
    ///
    /// Pass `None` to go back to real frame timing.
    pub fn set_fixed_step(&mut self, step: Option<Duration>) {
        self.fixed_step = step;
    }

    /// Set the time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = slow motion
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Reset to zero elapsed time, keeping step and scale settings.
    pub fn reset(&mut self) {
        self.last_update = Instant::now();
        self.elapsed = Duration::ZERO;
        self.delta = Duration::ZERO;
        self.frame_count = 0;
        self.paused = false;
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}
