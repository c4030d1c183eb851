//! Partitioning a snapshot into a grid of particles.
//!
//! The grid density is fixed by a target column count: the tile side
//! ("radius") is `width / columns`, and rows follow from the height. Very
//! flat snapshots that would get no rows at that radius fall back to a
//! radius of `height / 4`.
//!
//! # Example
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(1);
//! let snapshot = Snapshot::at(RgbaImage::new(150, 60), Vec2::ZERO);
//! let mut field = ParticleField::new(&snapshot, &TrajectoryGenerator::default(), &mut rng);
//! assert_eq!((field.rows(), field.cols()), (6, 15));
//!
//! field.advance(0.5);
//! field.render(&mut canvas);
//! ```

use crate::geometry::Rect;
use crate::particle::Particle;
use crate::snapshot::Snapshot;
use crate::surface::RenderSurface;
use crate::trajectory::TrajectoryGenerator;
use glam::Vec2;
use image::imageops;
use log::debug;
use rand::Rng;

/// Target number of tile columns.
pub const COLUMN_COUNT: u32 = 15;

/// Scale of the field at the end of the animation, about its center.
pub const END_SCALE: f32 = 1.3;

/// Row count used when the snapshot is too flat for the target density.
pub const FALLBACK_ROW_COUNT: u32 = 4;

/// Tile grid dimensions for a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    /// Tile side length in pixels.
    pub radius: u32,
    pub rows: u32,
    pub cols: u32,
    /// Whether the flat-snapshot radius was used.
    pub fallback: bool,
}

impl GridLayout {
    const EMPTY: Self = Self {
        radius: 0,
        rows: 0,
        cols: 0,
        fallback: false,
    };

    /// Lay out a `width` x `height` raster for `column_count` target columns.
    ///
    /// Rasters too small to hold a single whole tile get an empty layout.
    pub fn for_size(width: u32, height: u32, column_count: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::EMPTY;
        }

        let mut radius = width / column_count.max(1);
        let mut fallback = false;
        if radius == 0 || height / radius == 0 {
            radius = height / FALLBACK_ROW_COUNT;
            fallback = true;
        }
        if radius == 0 {
            return Self { fallback, ..Self::EMPTY };
        }

        Self {
            radius,
            rows: height / radius,
            cols: width / radius,
            fallback,
        }
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All particles cut from one snapshot.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bound: Rect,
    layout: GridLayout,
}

impl ParticleField {
    /// Shatter `snapshot` at the default density.
    pub fn new<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        generator: &TrajectoryGenerator,
        rng: &mut R,
    ) -> Self {
        Self::with_column_count(snapshot, COLUMN_COUNT, generator, rng)
    }

    /// Shatter `snapshot` into tiles of side `width / column_count`.
    ///
    /// Particles are stored row-major.
    pub fn with_column_count<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        column_count: u32,
        generator: &TrajectoryGenerator,
        rng: &mut R,
    ) -> Self {
        let bound = snapshot.raster_bound();
        let layout = GridLayout::for_size(snapshot.width(), snapshot.height(), column_count);
        let center = bound.center();
        let radius = layout.radius;
        let side = radius as f32;

        let mut particles = Vec::with_capacity(layout.len());
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let tile =
                    imageops::crop_imm(snapshot.image(), col * radius, row * radius, radius, radius)
                        .to_image();

                let origin = Vec2::new(
                    bound.left + (col * radius) as f32,
                    bound.top + (row * radius) as f32,
                );
                let src = Rect::from_origin_size(origin, side, side);
                let end = Rect::scale_point_about(origin, center, generator.end_scale());
                let dst = src.offset(end - origin);

                let params = generator.generate(row, col, side, rng);
                particles.push(Particle::new(tile, src, dst, params));
            }
        }

        debug!(
            "shattered {}x{} snapshot into {}x{} tiles of {}px{}",
            snapshot.width(),
            snapshot.height(),
            layout.rows,
            layout.cols,
            radius,
            if layout.fallback { " (flat fallback)" } else { "" }
        );

        Self {
            particles,
            bound,
            layout,
        }
    }

    /// Advance every particle to `progress`.
    ///
    /// Returns whether any particle is still visible.
    pub fn advance(&mut self, progress: f32) -> bool {
        let mut any_visible = false;
        for particle in &mut self.particles {
            any_visible |= particle.advance(progress);
        }
        any_visible
    }

    /// Draw every visible particle.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.render(surface);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The raster's rect in field coordinates.
    pub fn bound(&self) -> Rect {
        self.bound
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn rows(&self) -> u32 {
        self.layout.rows
    }

    pub fn cols(&self) -> u32 {
        self.layout.cols
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether any particle was visible after the last advance.
    pub fn any_visible(&self) -> bool {
        self.particles.iter().any(Particle::is_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn field(width: u32, height: u32) -> ParticleField {
        let snapshot = Snapshot::at(RgbaImage::new(width, height), Vec2::ZERO);
        let mut rng = SmallRng::seed_from_u64(5);
        ParticleField::new(&snapshot, &TrajectoryGenerator::default(), &mut rng)
    }

    #[test]
    fn test_layout_primary_radius() {
        let layout = GridLayout::for_size(150, 60, COLUMN_COUNT);
        assert_eq!(
            layout,
            GridLayout {
                radius: 10,
                rows: 6,
                cols: 15,
                fallback: false
            }
        );
        assert_eq!(layout.len(), 90);
    }

    #[test]
    fn test_layout_flat_fallback() {
        // radius 20 would give zero rows
        let layout = GridLayout::for_size(300, 12, COLUMN_COUNT);
        assert!(layout.fallback);
        assert_eq!(layout.radius, 3);
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.cols, 100);
    }

    #[test]
    fn test_layout_fallback_only_when_needed() {
        for (w, h) in [(15, 1), (150, 10), (151, 10), (300, 20), (45, 200)] {
            let layout = GridLayout::for_size(w, h, COLUMN_COUNT);
            let primary = w / COLUMN_COUNT;
            assert_eq!(layout.fallback, h / primary == 0, "{}x{}", w, h);
            assert_eq!(layout.rows, h / layout.radius);
            assert_eq!(layout.cols, w / layout.radius);
            assert!(layout.rows >= 1 && layout.cols >= 1);
        }
    }

    #[test]
    fn test_layout_degenerate() {
        assert!(GridLayout::for_size(0, 10, COLUMN_COUNT).is_empty());
        assert!(GridLayout::for_size(10, 0, COLUMN_COUNT).is_empty());
        // Too narrow for the target density and too short for the fallback.
        assert!(GridLayout::for_size(10, 3, COLUMN_COUNT).is_empty());
    }

    #[test]
    fn test_field_particle_count() {
        let f = field(150, 60);
        assert_eq!(f.len(), 90);
        assert_eq!((f.rows(), f.cols()), (6, 15));
    }

    #[test]
    fn test_zero_area_field_is_inert() {
        let mut f = field(0, 0);
        assert!(f.is_empty());
        assert!(!f.advance(0.5));
    }

    #[test]
    fn test_tiles_are_cut_from_their_cell() {
        let mut image = RgbaImage::new(30, 20);
        for (x, y, p) in image.enumerate_pixels_mut() {
            *p = Rgba([x as u8, y as u8, 0, 255]);
        }
        let snapshot = Snapshot::at(image, Vec2::new(100.0, 200.0));
        let mut rng = SmallRng::seed_from_u64(5);
        let f = ParticleField::new(&snapshot, &TrajectoryGenerator::default(), &mut rng);

        // radius 2, 10 rows x 15 cols
        assert_eq!((f.rows(), f.cols()), (10, 15));
        let p = &f.particles()[15 + 3];
        assert_eq!(p.tile().dimensions(), (2, 2));
        assert_eq!(p.tile().get_pixel(0, 0), &Rgba([6, 2, 0, 255]));
        assert_eq!(p.src_rect(), Rect::new(106.0, 202.0, 108.0, 204.0));
    }

    #[test]
    fn test_destination_scales_about_center() {
        let f = field(150, 60);
        let center = f.bound().center();
        for p in f.particles() {
            let src = p.src_rect();
            let dst = p.dst_rect();
            let expected = center + (src.origin() - center) * END_SCALE;
            assert!((dst.origin() - expected).length() < 1e-3);
            assert_eq!(dst.width(), src.width());
        }
    }

    #[test]
    fn test_destination_is_stable_across_frames() {
        let mut f = field(150, 60);
        let before: Vec<Rect> = f.particles().iter().map(Particle::dst_rect).collect();
        for i in 0..=10 {
            f.advance(i as f32 / 10.0);
        }
        let after: Vec<Rect> = f.particles().iter().map(Particle::dst_rect).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_advance_reports_visibility() {
        let mut f = field(150, 60);
        assert!(f.advance(0.0));
        assert!(f.advance(0.5));
        assert!(!f.advance(1.0));
        assert!(!f.any_visible());
    }
}
