//! # shatterfield
//!
//! Shatter a snapshot of a UI element into a grid of tiles that tumble,
//! drift outward, optionally droop under gravity, and fade away.
//!
//! Every tile of an explosion is driven by one shared progress value in
//! `[0, 1]`; a tile's position, rotation and opacity are closed-form
//! functions of it. Given a seeded RNG, the whole animation is reproducible
//! frame for frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use shatterfield::prelude::*;
//!
//! let snapshot = Snapshot::from_file("button.png", Vec2::new(40.0, 120.0))?;
//! let mut engine = ExplosionEngine::new();
//! engine.explode(snapshot, Mode::Confetti, Flags::SUPPORT_GRAVITY);
//!
//! let mut clock = AnimationClock::new();
//! loop {
//!     engine.frame(clock.update(), &mut surface);
//!     if engine.is_empty() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`TrajectoryGenerator`] | Random tumble and drop parameters per tile |
//! | [`Particle`] | One tile and its per-frame rect, rotation, alpha, transform |
//! | [`ParticleField`] | The tile grid cut from a snapshot |
//! | [`Explosion`] | One scheduled effect: pending, running, finished |
//! | [`ExplosionEngine`] | Active explosions, ticking, sweeping, drawing |
//!
//! ## Host Integration
//!
//! The host provides three things:
//!
//! - snapshots, via [`Snapshot`] or any [`ImageSource`]
//! - a monotonically non-decreasing elapsed time per frame, e.g. from
//!   [`AnimationClock`](time::AnimationClock)
//! - a [`RenderSurface`] that can draw an image through an affine transform
//!   with an alpha; [`Canvas`] is a software one
//!
//! Nothing on the frame path fails: empty snapshots shatter into zero
//! tiles and zero-length animations finish on their first tick.

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod explosion;
pub mod field;
pub mod geometry;
pub mod particle;
pub mod scale_fade;
pub mod snapshot;
pub mod surface;
pub mod time;
pub mod trajectory;

pub use config::{EngineConfig, TimingConfig};
pub use engine::{ExplosionEngine, Flags, Mode};
pub use error::{ConfigError, RasterError};
pub use explosion::{Effect, Explosion, ExplosionId, ExplosionState};
pub use field::{GridLayout, ParticleField};
pub use geometry::Rect;
pub use glam::{Affine2, Vec2, Vec3};
pub use particle::Particle;
pub use scale_fade::ScaleFade;
pub use snapshot::{ImageSource, Snapshot};
pub use surface::{Canvas, RenderSurface};
pub use trajectory::{TrajectoryGenerator, TrajectoryParams};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use shatterfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{ExplosionEngine, Flags, Mode};
    pub use crate::explosion::{ExplosionId, ExplosionState};
    pub use crate::geometry::Rect;
    pub use crate::snapshot::{ImageSource, Snapshot};
    pub use crate::surface::{Canvas, RenderSurface};
    pub use crate::time::AnimationClock;
    pub use crate::{Affine2, Vec2, Vec3};
}
