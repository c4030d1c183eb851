//! Whole-snapshot variant: no subdivision, the raster grows and fades.

use crate::easing::keep_finish;
use crate::geometry::Rect;
use crate::snapshot::Snapshot;
use crate::surface::RenderSurface;
use glam::Affine2;
use image::RgbaImage;

/// The snapshot scaled from 1 to `end_scale` about its center while it fades
/// along the keep-finish curve.
#[derive(Clone, Debug)]
pub struct ScaleFade {
    image: RgbaImage,
    bound: Rect,
    end_scale: f32,
    rect: Rect,
    alpha: f32,
}

impl ScaleFade {
    pub fn new(snapshot: Snapshot, end_scale: f32) -> Self {
        let bound = snapshot.raster_bound();
        let (image, _) = snapshot.into_parts();
        Self {
            image,
            bound,
            end_scale,
            rect: bound,
            alpha: 1.0,
        }
    }

    /// Evolve to `progress`, clamped to `[0, 1]`. Returns whether anything
    /// is left to draw.
    pub fn advance(&mut self, progress: f32) -> bool {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let scale = 1.0 + (self.end_scale - 1.0) * p;
        self.rect = self.bound.scaled_about(self.bound.center(), scale);
        self.alpha = 1.0 - keep_finish(p);
        self.is_visible()
    }

    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if self.is_visible() {
            surface.draw_tile(&self.image, &self.rect, &Affine2::IDENTITY, self.alpha);
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && !self.bound.is_empty()
    }
}
