//! Captured rasters of UI elements.
//!
//! How a snapshot is captured is up to the host. Anything that can produce
//! one implements [`ImageSource`]; closures returning `Option<Snapshot>` do
//! so automatically.

use crate::error::RasterError;
use crate::geometry::Rect;
use glam::Vec2;
use image::RgbaImage;
use std::path::Path;

/// An immutable pixel raster and the rect it occupies in field coordinates.
///
/// The bound may be larger than the raster (see
/// [`ExplosionEngine::expand_explosion_bound`](crate::ExplosionEngine::expand_explosion_bound));
/// effects re-center the raster inside it.
#[derive(Clone, Debug)]
pub struct Snapshot {
    image: RgbaImage,
    bound: Rect,
}

impl Snapshot {
    pub fn new(image: RgbaImage, bound: Rect) -> Self {
        Self { image, bound }
    }

    /// Snapshot whose bound is exactly the raster, placed at `origin`.
    pub fn at(image: RgbaImage, origin: Vec2) -> Self {
        let (w, h) = image.dimensions();
        let bound = Rect::from_origin_size(origin, w as f32, h as f32);
        Self { image, bound }
    }

    /// Load a snapshot from an image file, placed at `origin`.
    pub fn from_file(path: impl AsRef<Path>, origin: Vec2) -> Result<Self, RasterError> {
        let image = image::open(path.as_ref())?.into_rgba8();
        Ok(Self::at(image, origin))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn bound(&self) -> Rect {
        self.bound
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Grow the bound by `dx` and `dy` on every side.
    pub fn expanded(mut self, dx: f32, dy: f32) -> Self {
        self.bound = self.bound.inset(-dx, -dy);
        self
    }

    /// The raster's own rect: the bound shrunk around its center to the
    /// raster size.
    pub fn raster_bound(&self) -> Rect {
        self.bound.centered_to(self.image.width() as f32, self.image.height() as f32)
    }

    pub fn into_parts(self) -> (RgbaImage, Rect) {
        (self.image, self.bound)
    }
}

/// Produces snapshots for the engine to shatter.
pub trait ImageSource {
    /// Capture the element, or `None` if there is nothing to capture.
    fn snapshot(&self) -> Option<Snapshot>;
}

impl ImageSource for Snapshot {
    fn snapshot(&self) -> Option<Snapshot> {
        Some(self.clone())
    }
}

impl<F> ImageSource for F
where
    F: Fn() -> Option<Snapshot>,
{
    fn snapshot(&self) -> Option<Snapshot> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_uses_raster_size() {
        let s = Snapshot::at(RgbaImage::new(150, 60), Vec2::new(5.0, 7.0));
        assert_eq!(s.bound(), Rect::new(5.0, 7.0, 155.0, 67.0));
        assert!(!s.is_empty());
    }

    #[test]
    fn test_expanded_raster_bound_is_recentered() {
        let s = Snapshot::at(RgbaImage::new(40, 20), Vec2::new(100.0, 50.0));
        let original = s.bound();
        let s = s.expanded(32.0, 32.0);
        assert_eq!(s.bound(), Rect::new(68.0, 18.0, 172.0, 102.0));
        assert_eq!(s.raster_bound(), original);
    }

    #[test]
    fn test_closure_is_image_source() {
        let source = || Some(Snapshot::at(RgbaImage::new(2, 2), Vec2::ZERO));
        assert!(source.snapshot().is_some());

        let nothing = || -> Option<Snapshot> { None };
        assert!(ImageSource::snapshot(&nothing).is_none());
    }

    #[test]
    fn test_empty_raster() {
        let s = Snapshot::at(RgbaImage::new(0, 10), Vec2::ZERO);
        assert!(s.is_empty());
    }
}
