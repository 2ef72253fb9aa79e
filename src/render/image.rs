//! Pixel rendering for annotations using tiny-skia
//!
//! `PixmapSurface` is the annotation layer drawn over the screenshot. It
//! starts transparent; the screenshot itself is only read, and combined with
//! the layer when exporting.

use std::rc::Rc;

use anyhow::{Context, Result};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, LineCap as SkiaLineCap, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8,
    Stroke, Transform,
};

use super::geometry::shape;
use super::text::GlyphRenderer;
use super::{LineCap, Rgba, StrokeStyle, Surface, TextStyle};
use crate::domain::{Point, Rect};

/// Annotation layer backed by a tiny-skia pixmap
pub struct PixmapSurface {
    pixmap: Pixmap,
    glyphs: Option<Rc<GlyphRenderer>>,
    warned_no_font: bool,
}

impl PixmapSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("Cannot create a {width}x{height} surface"))?;
        Ok(Self {
            pixmap,
            glyphs: None,
            warned_no_font: false,
        })
    }

    /// Surface sized to match `image`
    pub fn for_image(image: &RgbaImage) -> Result<Self> {
        Self::new(image.width(), image.height())
    }

    /// Use `glyphs` for text annotations
    pub fn with_glyphs(mut self, glyphs: Option<Rc<GlyphRenderer>>) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Raw premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// The annotation layer as a straight-alpha image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// The annotated image: this layer composited over `base`
    ///
    /// `base` is copied, never written to.
    pub fn compose_over(&self, base: &RgbaImage) -> RgbaImage {
        let mut out = base.clone();
        image::imageops::overlay(&mut out, &self.to_rgba_image(), 0, 0);
        out
    }

    fn stroke(&mut self, path: &Path, style: &StrokeStyle) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(style.color.r, style.color.g, style.color.b, style.color.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width,
            line_cap: match style.cap {
                LineCap::Butt => SkiaLineCap::Butt,
                LineCap::Round => SkiaLineCap::Round,
            },
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    /// Source-over blend of `color` at `coverage` into one pixel
    fn plot(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        let (w, h) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        let idx = (y * w + x) as usize;
        let pixels = self.pixmap.pixels_mut();
        pixels[idx] = blend_over(pixels[idx], color, coverage);
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
    }

    fn stroke_rect(&mut self, origin: Point, extent: Point, style: &StrokeStyle) {
        let (x0, y0) = (origin.x as f32, origin.y as f32);
        let (x1, y1) = ((origin.x + extent.x) as f32, (origin.y + extent.y) as f32);

        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y0);
        pb.line_to(x1, y1);
        pb.line_to(x0, y1);
        pb.close();
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &StrokeStyle) {
        if let Some(path) = build_ellipse_path(center, rx as f32, ry as f32) {
            self.stroke(&path, style);
        }
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle) {
        if let Some(path) = build_ellipse_path(center, radius as f32, radius as f32) {
            self.stroke(&path, style);
        }
    }

    fn draw_text(&mut self, text: &str, baseline: Point, style: &TextStyle) {
        let Some(glyphs) = self.glyphs.clone() else {
            if !self.warned_no_font {
                log::warn!("No font available, text annotations are not drawn");
                self.warned_no_font = true;
            }
            return;
        };
        let origin = (baseline.x as f32, baseline.y as f32);
        let reach = style.outline_width.round().max(1.0) as i32;

        // Outline first: the glyph coverage stamped around each pixel
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx == 0 && dy == 0 {
                    continue;
                }
                glyphs.rasterize(text, style.size, origin, |x, y, coverage| {
                    self.plot(x + dx, y + dy, style.outline, coverage);
                });
            }
        }
        glyphs.rasterize(text, style.size, origin, |x, y, coverage| {
            self.plot(x, y, style.fill, coverage);
        });
    }

    fn blit(&mut self, source: &RgbaImage, origin: Point, extent: Point) {
        let (w, h) = self.size();
        let Some(region) = Rect::from_origin_extent(origin, extent)
            .intersect(Rect::bounds(source.width(), source.height()))
            .and_then(|r| r.intersect(Rect::bounds(w, h)))
        else {
            return;
        };
        for y in region.top..region.bottom {
            for x in region.left..region.right {
                let p = source.get_pixel(x as u32, y as u32);
                self.plot(x, y, Rgba::rgba(p[0], p[1], p[2], p[3]), 1.0);
            }
        }
    }
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(center: Point, rx: f32, ry: f32) -> Option<Path> {
    let (cx, cy) = (center.x as f32, center.y as f32);
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

/// Composite a straight-alpha colour over a premultiplied pixel
fn blend_over(dst: PremultipliedColorU8, color: Rgba, coverage: f32) -> PremultipliedColorU8 {
    let sa = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa >= 1.0 {
        return ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply();
    }
    let inv = 1.0 - sa;
    let a = (sa * 255.0 + f32::from(dst.alpha()) * inv).round().min(255.0) as u8;
    let channel = |s: u8, d: u8| {
        ((f32::from(s) * sa + f32::from(d) * inv).round().min(255.0) as u8).min(a)
    };
    PremultipliedColorU8::from_rgba(
        channel(color.r, dst.red()),
        channel(color.g, dst.green()),
        channel(color.b, dst.blue()),
        a,
    )
    .unwrap_or(dst)
}
