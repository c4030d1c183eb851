//! Easing curves for particle fade-out.
//!
//! Two curves are used:
//!
//! | Curve | Shape |
//! |-------|-------|
//! | [`decelerate`] | `1 - (1 - x)^(2f)`, a standard ease-out |
//! | [`KeepFinish`] | flat for most of the window, then a two-stage ease-out |
//!
//! `KeepFinish` is what drives particle alpha: tiles stay fully opaque for
//! the first 60% of their window and fade out over the rest, mostly in the
//! final 30%.

/// Shape factor of the decelerate curve used by the default keep-finish curve.
pub const DECELERATE_FACTOR: f32 = 0.6;

/// Decelerating ease-out: `1 - (1 - x)^(2 * factor)`.
///
/// With `factor == 1.0` this is the classic quadratic ease-out.
#[inline]
pub fn decelerate(x: f32, factor: f32) -> f32 {
    if factor == 1.0 {
        1.0 - (1.0 - x) * (1.0 - x)
    } else {
        1.0 - (1.0 - x).powf(2.0 * factor)
    }
}

/// Piecewise "keep-finish" curve.
///
/// ```text
/// f(t) = 0                                  t < start
///      = 0.4 * dec((t - start) / (keep - start))   start <= t < keep
///      = 0.4 + 0.6 * dec((t - keep) / (1 - keep))  keep <= t < 1
///      = 1                                  t >= 1
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeepFinish {
    /// Decelerate shape factor.
    pub factor: f32,
    /// Input at which the curve leaves zero.
    pub start_finish: f32,
    /// Input at which the curve switches to its second, longer stage.
    pub keep_finish: f32,
}

impl KeepFinish {
    /// The curve used for particle alpha: factor 0.6, stages at 0.6 and 0.7.
    pub const DEFAULT: Self = Self {
        factor: DECELERATE_FACTOR,
        start_finish: 0.6,
        keep_finish: 0.7,
    };

    /// Evaluate the curve at `t`.
    pub fn ease(&self, t: f32) -> f32 {
        if t < self.start_finish {
            0.0
        } else if t < self.keep_finish {
            let x = (t - self.start_finish) / (self.keep_finish - self.start_finish);
            0.4 * decelerate(x, self.factor)
        } else if t < 1.0 {
            let x = (t - self.keep_finish) / (1.0 - self.keep_finish);
            0.4 + 0.6 * decelerate(x, self.factor)
        } else {
            1.0
        }
    }
}

impl Default for KeepFinish {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Evaluate the default keep-finish curve.
#[inline]
pub fn keep_finish(t: f32) -> f32 {
    KeepFinish::DEFAULT.ease(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decelerate_endpoints() {
        assert_eq!(decelerate(0.0, 0.6), 0.0);
        assert!((decelerate(1.0, 0.6) - 1.0).abs() < 1e-6);
        assert_eq!(decelerate(0.5, 1.0), 0.75);
    }

    #[test]
    fn test_keep_finish_stages() {
        assert_eq!(keep_finish(0.0), 0.0);
        assert_eq!(keep_finish(0.59), 0.0);
        assert_eq!(keep_finish(0.6), 0.0);
        assert!((keep_finish(0.7) - 0.4).abs() < 1e-6);
        assert!(keep_finish(0.65) > 0.0 && keep_finish(0.65) < 0.4);
        assert!(keep_finish(0.9) > 0.4 && keep_finish(0.9) < 1.0);
        assert_eq!(keep_finish(1.0), 1.0);
        assert_eq!(keep_finish(1.5), 1.0);
    }

    #[test]
    fn test_keep_finish_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=1000 {
            let v = keep_finish(i as f32 / 1000.0);
            assert!(v >= last, "curve decreased at step {}", i);
            last = v;
        }
    }

    #[test]
    fn test_keep_finish_continuous_at_second_stage() {
        let before = keep_finish(0.7 - 1e-4);
        let after = keep_finish(0.7);
        assert!((after - before).abs() < 0.01);
    }
}
