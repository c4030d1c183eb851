//! The set of in-flight explosions and the trigger API.
//!
//! The host drives the engine once per redraw:
//!
//! ```ignore
//! let mut engine = ExplosionEngine::new();
//! engine.explode(snapshot, Mode::Confetti, Flags::SUPPORT_GRAVITY);
//!
//! // Every frame:
//! engine.tick(clock.update());   // advance everything first
//! engine.sweep();                // then drop what finished
//! engine.draw(&mut surface);     // then render
//! ```
//!
//! Ticking, sweeping and drawing are separate passes so the active set is
//! never mutated while it is being iterated, and a render always sees the
//! fully advanced state of the current tick.

use crate::config::EngineConfig;
use crate::explosion::{Effect, Explosion, ExplosionId, ExplosionState};
use crate::field::ParticleField;
use crate::scale_fade::ScaleFade;
use crate::snapshot::{ImageSource, Snapshot};
use crate::surface::RenderSurface;
use bitflags::bitflags;
use glam::Vec2;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// How a snapshot comes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// The whole snapshot grows and fades.
    Explosion,
    /// The snapshot shatters into tumbling tiles.
    #[default]
    Confetti,
}

bitflags! {
    /// Options for [`ExplosionEngine::explode`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Flags: u32 {
        /// Tiles droop along a parabola as they fly.
        const SUPPORT_GRAVITY = 0x1;
    }
}

/// Owns every active explosion.
#[derive(Debug)]
pub struct ExplosionEngine<R = SmallRng> {
    explosions: Vec<Explosion>,
    config: EngineConfig,
    mode: Mode,
    flags: Flags,
    expand_inset: Vec2,
    rng: R,
    next_id: u64,
}

impl ExplosionEngine<SmallRng> {
    /// Engine with the default configuration, seeded from entropy.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine for `config`, seeded from `config.seed` when present.
    pub fn with_config(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl Default for ExplosionEngine<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ExplosionEngine<R> {
    /// Engine drawing trajectories from `rng`.
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let expand_inset = Vec2::from_array(config.expand_inset);
        Self {
            explosions: Vec::new(),
            config,
            mode: Mode::default(),
            flags: Flags::empty(),
            expand_inset,
            rng,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mode used by [`ExplosionEngine::explode_source`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Add `flag` to the flags used by [`ExplosionEngine::explode_source`].
    pub fn set_flag(&mut self, flag: Flags) {
        self.flags |= flag;
    }

    pub fn check_flag(&self, flag: Flags) -> bool {
        self.flags.intersects(flag)
    }

    pub fn clear_flags(&mut self) {
        self.flags = Flags::empty();
    }

    /// How far a snapshot's bound grows on each side before it explodes.
    pub fn expand_explosion_bound(&mut self, dx: f32, dy: f32) {
        self.expand_inset = Vec2::new(dx, dy);
    }

    /// Capture `source` and explode it with the engine's mode and flags.
    ///
    /// Returns `None` when the source has nothing to capture.
    pub fn explode_source<S: ImageSource + ?Sized>(&mut self, source: &S) -> Option<ExplosionId> {
        let snapshot = source.snapshot()?;
        Some(self.explode(snapshot, self.mode, self.flags))
    }

    /// Build the effect for `mode` and schedule it with the mode's timing.
    pub fn explode(&mut self, snapshot: Snapshot, mode: Mode, flags: Flags) -> ExplosionId {
        let snapshot = snapshot.expanded(self.expand_inset.x, self.expand_inset.y);
        let (effect, timing) = match mode {
            Mode::Confetti => {
                let generator = self.config.generator(flags.contains(Flags::SUPPORT_GRAVITY));
                let field = ParticleField::with_column_count(
                    &snapshot,
                    self.config.column_count,
                    &generator,
                    &mut self.rng,
                );
                (Effect::Pieces(field), self.config.confetti)
            }
            Mode::Explosion => (
                Effect::ScaleFade(ScaleFade::new(snapshot, self.config.end_scale)),
                self.config.explosion,
            ),
        };
        self.schedule(effect, timing.start_delay(), timing.duration())
    }

    /// Register `effect` as a pending explosion.
    pub fn schedule(
        &mut self,
        effect: impl Into<Effect>,
        start_delay: Duration,
        duration: Duration,
    ) -> ExplosionId {
        let id = ExplosionId(self.next_id);
        self.next_id += 1;
        debug!(
            "scheduled explosion {} (delay {:?}, duration {:?})",
            id, start_delay, duration
        );
        self.explosions
            .push(Explosion::new(id, effect.into(), start_delay, duration));
        id
    }

    /// Advance every explosion to the driver's `elapsed` time.
    ///
    /// Finished explosions stay in the set until [`ExplosionEngine::sweep`].
    pub fn tick(&mut self, elapsed: Duration) {
        for explosion in &mut self.explosions {
            explosion.tick(elapsed);
        }
    }

    /// Drop finished explosions. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.explosions.len();
        self.explosions.retain(|e| !e.is_finished());
        let removed = before - self.explosions.len();
        if removed > 0 {
            debug!("swept {} finished explosion(s), {} active", removed, self.explosions.len());
        }
        removed
    }

    /// Render every running explosion, asking for another frame while any
    /// explosion is still active.
    pub fn draw<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        for explosion in &self.explosions {
            explosion.render(surface);
        }
        if self.explosions.iter().any(|e| !e.is_finished()) {
            surface.request_redraw();
        }
    }

    /// Tick, sweep and draw in one call.
    pub fn frame<S: RenderSurface + ?Sized>(&mut self, elapsed: Duration, surface: &mut S) {
        self.tick(elapsed);
        self.sweep();
        self.draw(surface);
    }

    /// Drop every explosion immediately, whatever its progress.
    pub fn clear(&mut self) {
        if !self.explosions.is_empty() {
            debug!("cleared {} explosion(s)", self.explosions.len());
        }
        self.explosions.clear();
    }

    pub fn get(&self, id: ExplosionId) -> Option<&Explosion> {
        self.explosions.iter().find(|e| e.id() == id)
    }

    pub fn state(&self, id: ExplosionId) -> Option<ExplosionState> {
        self.get(id).map(Explosion::state)
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn engine() -> ExplosionEngine {
        ExplosionEngine::with_config(EngineConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    fn snapshot() -> Snapshot {
        Snapshot::at(RgbaImage::new(150, 60), Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_flags() {
        let mut e = engine();
        assert!(!e.check_flag(Flags::SUPPORT_GRAVITY));
        e.set_flag(Flags::SUPPORT_GRAVITY);
        e.set_flag(Flags::empty());
        assert!(e.check_flag(Flags::SUPPORT_GRAVITY));
        e.clear_flags();
        assert!(!e.check_flag(Flags::SUPPORT_GRAVITY));
    }

    #[test]
    fn test_confetti_uses_confetti_timing() {
        let mut e = engine();
        let id = e.explode(snapshot(), Mode::Confetti, Flags::empty());
        let explosion = e.get(id).unwrap();
        assert_eq!(explosion.start_delay(), Duration::from_millis(25));
        assert_eq!(explosion.duration(), Duration::from_millis(1200));
        match explosion.effect() {
            Effect::Pieces(field) => {
                assert_eq!(field.len(), 90);
                assert_eq!(field.bound(), snapshot().bound());
            }
            other => panic!("expected pieces, got {:?}", other),
        }
    }

    #[test]
    fn test_gravity_flag_reaches_particles() {
        let mut e = engine();
        let id = e.explode(snapshot(), Mode::Confetti, Flags::SUPPORT_GRAVITY);
        let Effect::Pieces(field) = e.get(id).unwrap().effect() else {
            panic!("expected pieces");
        };
        assert!(field.particles().iter().all(|p| p.params().gravity > 0.0));

        let id = e.explode(snapshot(), Mode::Confetti, Flags::empty());
        let Effect::Pieces(field) = e.get(id).unwrap().effect() else {
            panic!("expected pieces");
        };
        assert!(field.particles().iter().all(|p| p.params().gravity == 0.0));
    }

    #[test]
    fn test_explosion_mode_uses_scale_fade() {
        let mut e = engine();
        let id = e.explode(snapshot(), Mode::Explosion, Flags::empty());
        let explosion = e.get(id).unwrap();
        assert!(matches!(explosion.effect(), Effect::ScaleFade(_)));
        assert_eq!(explosion.start_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_explode_source_uses_engine_mode() {
        let mut e = engine();
        e.set_mode(Mode::Explosion);
        let id = e.explode_source(&snapshot()).unwrap();
        assert!(matches!(e.get(id).unwrap().effect(), Effect::ScaleFade(_)));

        let empty = || -> Option<Snapshot> { None };
        assert!(e.explode_source(&empty).is_none());
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn test_sweep_removes_only_finished() {
        let mut e = engine();
        let short = e.explode(snapshot(), Mode::Confetti, Flags::empty());
        let generator = e.config().generator(false);
        let field = ParticleField::new(&snapshot(), &generator, &mut SmallRng::seed_from_u64(1));
        let long = e.schedule(field, Duration::ZERO, Duration::from_secs(10));

        e.tick(Duration::ZERO);
        e.tick(Duration::from_millis(1225));
        assert_eq!(e.state(short), Some(ExplosionState::Finished));
        assert_eq!(e.state(long), Some(ExplosionState::Running));

        assert_eq!(e.sweep(), 1);
        assert_eq!(e.sweep(), 0);
        assert!(e.get(short).is_none());
        assert!(e.get(long).is_some());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut e = engine();
        e.explode(snapshot(), Mode::Confetti, Flags::empty());
        e.explode(snapshot(), Mode::Explosion, Flags::empty());
        e.clear();
        assert!(e.is_empty());
        e.clear();
        assert!(e.is_empty());
    }

    #[test]
    fn test_zero_area_snapshot_degrades() {
        let mut e = engine();
        let empty = Snapshot::at(RgbaImage::new(0, 0), Vec2::ZERO);
        let id = e.explode(empty, Mode::Confetti, Flags::empty());
        e.tick(Duration::ZERO);
        e.tick(Duration::from_secs(2));
        assert_eq!(e.state(id), Some(ExplosionState::Finished));
    }
}
