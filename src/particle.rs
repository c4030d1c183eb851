//! A single shattered tile and its per-frame state.
//!
//! A particle's whole animation is a closed-form function of the shared
//! progress value: there is no per-particle clock, velocity or integration
//! step. Calling [`Particle::advance`] twice with the same progress yields the
//! same state.

use crate::easing::keep_finish;
use crate::geometry::Rect;
use crate::surface::RenderSurface;
use crate::trajectory::TrajectoryParams;
use glam::{Affine2, Mat2, Mat3, Vec2, Vec3};
use image::RgbaImage;

/// Normalized time at which the gravity parabola bottoms out.
pub const GRAVITY_APEX: f32 = 0.3;

#[inline]
fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// One tile of a shattered snapshot.
#[derive(Clone, Debug)]
pub struct Particle {
    tile: RgbaImage,
    src: Rect,
    dst: Rect,
    params: TrajectoryParams,

    rect: Rect,
    rotation: Vec3,
    alpha: f32,
    transform: Affine2,
}

impl Particle {
    /// Create a particle that travels from `src` to `dst`.
    ///
    /// `dst` is fixed for the particle's lifetime.
    pub fn new(tile: RgbaImage, src: Rect, dst: Rect, params: TrajectoryParams) -> Self {
        Self {
            tile,
            src,
            dst,
            rect: src,
            rotation: params.start_rotation,
            alpha: 1.0,
            transform: Affine2::IDENTITY,
            params,
        }
    }

    /// Evolve to `progress` in `[0, 1]`; values outside are clamped.
    ///
    /// Returns whether the particle is visible afterwards.
    pub fn advance(&mut self, progress: f32) -> bool {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let TrajectoryParams { life, overflow, .. } = self.params;

        if progress < life || progress > 1.0 - overflow {
            self.alpha = 0.0;
            return false;
        }

        // The division can land a hair under 1 at the window end.
        let t = if progress >= 1.0 - overflow {
            1.0
        } else {
            ((progress - life) / self.params.window()).min(1.0)
        };
        self.alpha = 1.0 - keep_finish(t);

        let left = lerp(self.src.left, self.dst.left, t);
        let top = lerp(self.src.top, self.dst.top, t) + self.gravity_offset(t);
        self.rect =
            Rect::from_origin_size(Vec2::new(left, top), self.src.width(), self.src.height());

        self.rotation = self.params.start_rotation.lerp(self.params.end_rotation, t);
        self.transform = tumble_transform(self.rotation, self.rect.center());

        self.alpha > 0.0
    }

    /// Vertical gravity displacement at normalized time `t`.
    #[inline]
    pub fn gravity_offset(&self, t: f32) -> f32 {
        let d = t - GRAVITY_APEX;
        self.params.gravity * d * d
    }

    /// Draw the tile if it is visible.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if self.alpha > 0.0 {
            surface.draw_tile(&self.tile, &self.rect, &self.transform, self.alpha);
        }
    }

    pub fn tile(&self) -> &RgbaImage {
        &self.tile
    }

    pub fn src_rect(&self) -> Rect {
        self.src
    }

    pub fn dst_rect(&self) -> Rect {
        self.dst
    }

    /// Current rect, before the tumble transform is applied.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Current rotation in degrees, one component per axis.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    pub fn params(&self) -> &TrajectoryParams {
        &self.params
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Rotate about X, then Y, then Z (degrees), flatten onto the screen plane
/// and pivot the result on `pivot`.
///
/// The flattening is orthographic: the depth row and column of the 3D
/// rotation are dropped, with no perspective divide.
///
/// All three axes turn in the same direction for positive angles, so a
/// positive Z rotation is counter-clockwise in y-up coordinates.
pub fn tumble_transform(rotation: Vec3, pivot: Vec2) -> Affine2 {
    let rotation_3d = Mat3::from_rotation_z(rotation.z.to_radians())
        * Mat3::from_rotation_y(rotation.y.to_radians())
        * Mat3::from_rotation_x(rotation.x.to_radians());
    let planar = Mat2::from_cols(rotation_3d.x_axis.truncate(), rotation_3d.y_axis.truncate());

    Affine2::from_translation(pivot)
        * Affine2::from_mat2(planar)
        * Affine2::from_translation(-pivot)
}
