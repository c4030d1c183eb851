//! One scheduled shatter animation and its lifecycle.
//!
//! ```text
//!   Pending ──(start delay elapsed)──▶ Running ──(progress reaches 1)──▶ Finished
//! ```
//!
//! An explosion measures time from its first tick: the elapsed value seen on
//! that tick becomes its origin, so a single monotonic clock can drive
//! explosions triggered at different moments.

use crate::field::ParticleField;
use crate::scale_fade::ScaleFade;
use crate::surface::RenderSurface;
use log::debug;
use std::fmt;
use std::time::Duration;

/// Identifies an explosion within its engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExplosionId(pub(crate) u64);

impl fmt::Display for ExplosionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of an [`Explosion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExplosionState {
    /// Scheduled, start delay not yet elapsed.
    #[default]
    Pending,
    /// Animating.
    Running,
    /// Progress reached 1; waiting to be swept.
    Finished,
}

/// What an explosion animates.
#[derive(Clone, Debug)]
pub enum Effect {
    /// Snapshot shattered into tumbling tiles.
    Pieces(ParticleField),
    /// Snapshot scaled up and faded as a whole.
    ScaleFade(ScaleFade),
}

impl Effect {
    fn advance(&mut self, progress: f32) -> bool {
        match self {
            Effect::Pieces(field) => field.advance(progress),
            Effect::ScaleFade(fade) => fade.advance(progress),
        }
    }

    fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            Effect::Pieces(field) => field.render(surface),
            Effect::ScaleFade(fade) => fade.render(surface),
        }
    }
}

impl From<ParticleField> for Effect {
    fn from(field: ParticleField) -> Self {
        Effect::Pieces(field)
    }
}

impl From<ScaleFade> for Effect {
    fn from(fade: ScaleFade) -> Self {
        Effect::ScaleFade(fade)
    }
}

/// A scheduled effect with a start delay and duration.
#[derive(Clone, Debug)]
pub struct Explosion {
    id: ExplosionId,
    effect: Effect,
    start_delay: Duration,
    duration: Duration,
    origin: Option<Duration>,
    progress: f32,
    state: ExplosionState,
}

impl Explosion {
    pub(crate) fn new(
        id: ExplosionId,
        effect: Effect,
        start_delay: Duration,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            effect,
            start_delay,
            duration,
            origin: None,
            progress: 0.0,
            state: ExplosionState::Pending,
        }
    }

    /// Progress for `local` time since the first tick, in `[0, 1]`.
    ///
    /// Holds at 0 during the start delay. A zero duration jumps straight to 1
    /// once the delay has passed.
    pub fn progress_at(&self, local: Duration) -> f32 {
        let Some(active) = local.checked_sub(self.start_delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let ratio = active.as_nanos() as f64 / self.duration.as_nanos() as f64;
        ratio.clamp(0.0, 1.0) as f32
    }

    /// Evolve to the driver's `elapsed` time and return the resulting state.
    ///
    /// Finished explosions are left untouched.
    pub fn tick(&mut self, elapsed: Duration) -> ExplosionState {
        if self.state == ExplosionState::Finished {
            return self.state;
        }

        let origin = *self.origin.get_or_insert(elapsed);
        let local = elapsed.saturating_sub(origin);
        if local < self.start_delay {
            self.progress = 0.0;
            return self.state;
        }

        if self.state == ExplosionState::Pending {
            debug!("explosion {} running", self.id);
            self.state = ExplosionState::Running;
        }

        self.progress = self.progress_at(local);
        self.effect.advance(self.progress);

        if self.progress >= 1.0 {
            debug!("explosion {} finished", self.id);
            self.state = ExplosionState::Finished;
        }
        self.state
    }

    /// Draw the effect if the explosion is running.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if self.state == ExplosionState::Running {
            self.effect.render(surface);
        }
    }

    pub fn id(&self) -> ExplosionId {
        self.id
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn state(&self) -> ExplosionState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.state == ExplosionState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use glam::Vec2;
    use image::RgbaImage;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn explosion(delay: u64, duration: u64) -> Explosion {
        let fade = ScaleFade::new(Snapshot::at(RgbaImage::new(10, 10), Vec2::ZERO), 1.3);
        Explosion::new(ExplosionId(1), fade.into(), ms(delay), ms(duration))
    }

    #[test]
    fn test_progress_holds_during_delay() {
        let e = explosion(100, 1000);
        assert_eq!(e.progress_at(ms(0)), 0.0);
        assert_eq!(e.progress_at(ms(99)), 0.0);
        assert_eq!(e.progress_at(ms(600)), 0.5);
        assert_eq!(e.progress_at(ms(5000)), 1.0);
    }

    #[test]
    fn test_pending_until_delay_elapses() {
        let mut e = explosion(25, 1200);
        assert_eq!(e.tick(ms(1000)), ExplosionState::Pending);
        assert_eq!(e.tick(ms(1010)), ExplosionState::Pending);
        assert_eq!(e.tick(ms(1025)), ExplosionState::Running);
        assert_eq!(e.progress(), 0.0);
        assert_eq!(e.tick(ms(1625)), ExplosionState::Running);
        assert_eq!(e.progress(), 0.5);
        assert_eq!(e.tick(ms(2225)), ExplosionState::Finished);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut e = explosion(0, 0);
        assert_eq!(e.tick(ms(0)), ExplosionState::Finished);
        assert_eq!(e.progress(), 1.0);
    }

    #[test]
    fn test_finished_is_terminal() {
        let mut e = explosion(0, 10);
        e.tick(ms(0));
        e.tick(ms(10));
        assert!(e.is_finished());
        assert_eq!(e.tick(ms(0)), ExplosionState::Finished);
        assert_eq!(e.progress(), 1.0);
    }
}
