//! Render targets for shattered tiles.
//!
//! The engine never rasterizes directly; it issues draw calls through
//! [`RenderSurface`] during a render pass. Hosts implement the trait over
//! their own canvas. [`Canvas`] is a software implementation that composites
//! onto an RGBA image, used by the command-line renderer and in tests.

use crate::error::RasterError;
use crate::geometry::Rect;
use glam::{Affine2, Vec2};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Destination for particle draw calls.
pub trait RenderSurface {
    /// Draw `tile` stretched over `rect`, then mapped through `transform`,
    /// with its own alpha multiplied by `alpha`.
    ///
    /// `rect` and `transform` are in field coordinates.
    fn draw_tile(&mut self, tile: &RgbaImage, rect: &Rect, transform: &Affine2, alpha: f32);

    /// Ask the host to schedule another frame.
    fn request_redraw(&mut self) {}
}

/// Software surface compositing onto an RGBA image.
///
/// Canvas pixel `(x, y)` covers field coordinates
/// `origin + (x, y) .. origin + (x + 1, y + 1)`.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbaImage,
    origin: Vec2,
    redraw_requested: bool,
}

impl Canvas {
    /// Create a transparent canvas of the given size whose top-left pixel
    /// sits at field coordinate `origin`.
    pub fn new(width: u32, height: u32, origin: Vec2) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            origin,
            redraw_requested: false,
        }
    }

    /// Create a canvas covering `bound`, rounded outward to whole pixels.
    pub fn covering(bound: &Rect) -> Self {
        let left = bound.left.floor();
        let top = bound.top.floor();
        let width = (bound.right.ceil() - left).max(0.0) as u32;
        let height = (bound.bottom.ceil() - top).max(0.0) as u32;
        Self::new(width, height, Vec2::new(left, top))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Reset every pixel to transparent and drop any pending redraw request.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.redraw_requested = false;
    }

    /// Whether a redraw was requested since the last [`Canvas::take_redraw_request`].
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Write the canvas to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.image.save(path)?;
        Ok(())
    }
}

impl RenderSurface for Canvas {
    fn draw_tile(&mut self, tile: &RgbaImage, rect: &Rect, transform: &Affine2, alpha: f32) {
        let (tile_w, tile_h) = tile.dimensions();
        if tile_w == 0 || tile_h == 0 || alpha <= 0.0 || rect.is_empty() {
            return;
        }

        // Tile pixels -> rect -> transform -> canvas pixels.
        let to_rect = Affine2::from_scale_angle_translation(
            Vec2::new(rect.width() / tile_w as f32, rect.height() / tile_h as f32),
            0.0,
            rect.origin(),
        );
        let forward = Affine2::from_translation(-self.origin) * *transform * to_rect;
        if forward.matrix2.determinant().abs() < 1e-6 {
            // Edge-on tile: nothing to cover.
            return;
        }
        let inverse = forward.inverse();

        let corners = [
            Vec2::ZERO,
            Vec2::new(tile_w as f32, 0.0),
            Vec2::new(0.0, tile_h as f32),
            Vec2::new(tile_w as f32, tile_h as f32),
        ]
        .map(|c| forward.transform_point2(c));
        let min = corners.iter().fold(Vec2::splat(f32::INFINITY), |a, &c| a.min(c));
        let max = corners.iter().fold(Vec2::splat(f32::NEG_INFINITY), |a, &c| a.max(c));

        let (canvas_w, canvas_h) = self.image.dimensions();
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(canvas_w);
        let y1 = (max.y.ceil().max(0.0) as u32).min(canvas_h);

        for y in y0..y1 {
            for x in x0..x1 {
                let uv = inverse.transform_point2(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                if uv.x < 0.0 || uv.y < 0.0 || uv.x >= tile_w as f32 || uv.y >= tile_h as f32 {
                    continue;
                }
                let src = tile.get_pixel(uv.x as u32, uv.y as u32);
                let dst = self.image.get_pixel_mut(x, y);
                blend_over(dst, src, alpha);
            }
        }
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

/// Source-over compositing of straight-alpha pixels.
fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>, alpha: f32) {
    let sa = src[3] as f32 / 255.0 * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let s = src[i] as f32;
        let d = dst[i] as f32;
        dst[i] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
