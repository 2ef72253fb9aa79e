//! Annotation rendering module
//!
//! This module contains:
//! - The `Surface` capability annotations draw onto
//! - Geometry and style constants shared by all surfaces
//! - Per-kind draw rules
//! - A tiny-skia backed surface (for display and export)
//! - A recording surface (for headless hosts and tests)
//! - Blur precomputation and glyph rasterisation

pub mod draw;
pub mod geometry;
pub mod image;
pub mod pixelate;
pub mod record;
pub mod text;

use ::image::RgbaImage;

use crate::domain::Point;

pub use draw::draw_annotation;

/// 8-bit RGBA colour (not premultiplied)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Colour with a fractional (0.0-1.0) alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }
}

/// How stroke ends are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Stroke parameters for outline primitives
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgba,
    pub cap: LineCap,
}

/// Text parameters: filled glyphs over a thin outline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_width: f32,
}

/// A 2D drawing surface annotations render onto
///
/// Implementations must be deterministic: the same sequence of calls on a
/// cleared surface produces the same result.
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Rectangle outline from `origin` spanning `extent` (may be negative)
    fn stroke_rect(&mut self, origin: Point, extent: Point, style: &StrokeStyle);

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &StrokeStyle);

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle);

    /// Draw `text` with its baseline starting at `baseline`
    fn draw_text(&mut self, text: &str, baseline: Point, style: &TextStyle);

    /// Copy the `origin`/`extent` region of `source` to the same coordinates
    fn blit(&mut self, source: &RgbaImage, origin: Point, extent: Point);
}
