//! Procedural trajectory generation for particles.
//!
//! Every tile gets a random tumble: a random starting orientation on each
//! axis and an end orientation drawn from one of three spin buckets, so a
//! shattered snapshot mixes slow, medium and fast-spinning pieces.
//!
//! | Bucket | Probability | End angle range |
//! |--------|-------------|-----------------|
//! | slow   | 0.3 | `[0°, 360°)` |
//! | medium | 0.4 | `[360°, 540°)` |
//! | fast   | 0.3 | `[720°, 900°)` |
//!
//! Randomness is always injected, so a seeded RNG reproduces a field exactly:
//!
//! ```ignore
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let generator = TrajectoryGenerator::new(1.3).with_gravity(true);
//! let params = generator.generate(0, 3, 10.0, &mut rng);
//! ```

use glam::Vec3;
use log::{trace, warn};
use rand::Rng;

/// Full turn, in degrees. Start angles are drawn from `[0, FULL_TURN)`.
pub const FULL_TURN: f32 = 360.0;

/// Width of the medium and fast spin buckets, in degrees.
const HALF_TURN: f32 = 180.0;

/// Divisor in the gravity coefficient. Kept as-is for visual parity.
pub const GRAVITY_DIVISOR: f32 = 0.02;

/// Per-particle animation parameters.
///
/// Angles are in degrees, one component per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryParams {
    /// Orientation at `t = 0`.
    pub start_rotation: Vec3,
    /// Orientation at `t = 1`.
    pub end_rotation: Vec3,
    /// Peak height of the parabolic drop, 0 when gravity is off.
    pub gravity: f32,
    /// Fraction of progress before the particle becomes visible.
    pub life: f32,
    /// Fraction of progress after which the particle is gone.
    pub overflow: f32,
}

impl TrajectoryParams {
    /// Length of the active window as a fraction of total progress.
    #[inline]
    pub fn window(&self) -> f32 {
        1.0 - self.life - self.overflow
    }
}

/// Check that a `(life, overflow)` pair leaves a non-empty visible window.
pub fn is_valid_window(life: f32, overflow: f32) -> bool {
    life >= 0.0 && overflow >= 0.0 && life + overflow < 1.0
}

/// Generates [`TrajectoryParams`] for the tiles of one field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryGenerator {
    end_scale: f32,
    gravity: bool,
    life: f32,
    overflow: f32,
}

impl TrajectoryGenerator {
    /// Create a generator for a field that grows to `end_scale` by the end
    /// of the animation. Gravity is off and the window spans all progress.
    pub fn new(end_scale: f32) -> Self {
        Self {
            end_scale,
            gravity: false,
            life: 0.0,
            overflow: 0.0,
        }
    }

    /// Enable or disable the parabolic drop.
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.gravity = enabled;
        self
    }

    /// Set the visibility window shared by generated particles.
    ///
    /// A pair with `life + overflow >= 1` (or negative parts) would leave no
    /// visible frames; it is rejected and the full window is kept.
    pub fn with_window(mut self, life: f32, overflow: f32) -> Self {
        if is_valid_window(life, overflow) {
            self.life = life;
            self.overflow = overflow;
        } else {
            warn!(
                "ignoring particle window life={} overflow={}: life + overflow must be in [0, 1)",
                life, overflow
            );
            self.life = 0.0;
            self.overflow = 0.0;
        }
        self
    }

    pub fn end_scale(&self) -> f32 {
        self.end_scale
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    /// Gravity coefficient for a tile of the given height.
    pub fn gravity_for(&self, tile_height: f32) -> f32 {
        if self.gravity {
            tile_height * (self.end_scale - 1.0) / GRAVITY_DIVISOR
        } else {
            0.0
        }
    }

    /// Generate the trajectory of the tile at (`row`, `column`).
    pub fn generate<R: Rng + ?Sized>(
        &self,
        row: u32,
        column: u32,
        tile_size: f32,
        rng: &mut R,
    ) -> TrajectoryParams {
        let start_rotation = Vec3::new(
            FULL_TURN * rng.gen::<f32>(),
            FULL_TURN * rng.gen::<f32>(),
            FULL_TURN * rng.gen::<f32>(),
        );
        let end_rotation = Vec3::new(
            sample_end_rotation(rng),
            sample_end_rotation(rng),
            sample_end_rotation(rng),
        );

        let params = TrajectoryParams {
            start_rotation,
            end_rotation,
            gravity: self.gravity_for(tile_size),
            life: self.life,
            overflow: self.overflow,
        };
        trace!("tile ({}, {}) -> {:?}", row, column, params);
        params
    }
}

impl Default for TrajectoryGenerator {
    fn default() -> Self {
        Self::new(crate::field::END_SCALE)
    }
}

/// Draw one end angle from the slow/medium/fast buckets.
pub fn sample_end_rotation<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let roll: f32 = rng.gen();
    if roll < 0.3 {
        FULL_TURN * rng.gen::<f32>()
    } else if roll < 0.7 {
        FULL_TURN + HALF_TURN * rng.gen::<f32>()
    } else {
        FULL_TURN * 2.0 + HALF_TURN * rng.gen::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_start_rotation_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        let generator = TrajectoryGenerator::new(1.3);
        for _ in 0..500 {
            let p = generator.generate(0, 0, 10.0, &mut rng);
            for angle in p.start_rotation.to_array() {
                assert!((0.0..FULL_TURN).contains(&angle));
            }
        }
    }

    #[test]
    fn test_end_rotation_bucket_proportions() {
        let mut rng = SmallRng::seed_from_u64(42);
        let draws = 30_000;
        let mut buckets = [0u32; 3];
        for _ in 0..draws {
            let angle = sample_end_rotation(&mut rng);
            match angle {
                a if (0.0..360.0).contains(&a) => buckets[0] += 1,
                a if (360.0..540.0).contains(&a) => buckets[1] += 1,
                a if (720.0..900.0).contains(&a) => buckets[2] += 1,
                a => panic!("angle {} outside every bucket", a),
            }
        }
        let share = |n: u32| n as f32 / draws as f32;
        assert!((share(buckets[0]) - 0.3).abs() < 0.02);
        assert!((share(buckets[1]) - 0.4).abs() < 0.02);
        assert!((share(buckets[2]) - 0.3).abs() < 0.02);
    }

    #[test]
    fn test_gravity_coefficient() {
        let off = TrajectoryGenerator::new(1.3);
        assert_eq!(off.gravity_for(10.0), 0.0);

        let on = TrajectoryGenerator::new(1.3).with_gravity(true);
        assert!((on.gravity_for(10.0) - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_window_is_full() {
        let mut rng = SmallRng::seed_from_u64(3);
        let p = TrajectoryGenerator::new(1.3).generate(2, 5, 8.0, &mut rng);
        assert_eq!(p.life, 0.0);
        assert_eq!(p.overflow, 0.0);
        assert_eq!(p.window(), 1.0);
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let g = TrajectoryGenerator::new(1.3).with_window(0.6, 0.4);
        let mut rng = SmallRng::seed_from_u64(3);
        let p = g.generate(0, 0, 8.0, &mut rng);
        assert_eq!((p.life, p.overflow), (0.0, 0.0));

        let g = TrajectoryGenerator::new(1.3).with_window(0.2, 0.3);
        let p = g.generate(0, 0, 8.0, &mut rng);
        assert_eq!((p.life, p.overflow), (0.2, 0.3));
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let g = TrajectoryGenerator::new(1.3).with_gravity(true);
        let a = g.generate(1, 1, 12.0, &mut SmallRng::seed_from_u64(99));
        let b = g.generate(1, 1, 12.0, &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
