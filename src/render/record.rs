//! Recording surface
//!
//! `DisplayList` keeps the calls made against it instead of rasterising them.
//! Hosts that draw with their own toolkit can replay the list; tests use it
//! to assert draw order and geometry.

use image::RgbaImage;

use super::{StrokeStyle, Surface, TextStyle};
use crate::domain::Point;

/// One recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
    Rect {
        origin: Point,
        extent: Point,
        style: StrokeStyle,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        style: StrokeStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        style: StrokeStyle,
    },
    Text {
        text: String,
        baseline: Point,
        style: TextStyle,
    },
    Blit {
        origin: Point,
        extent: Point,
    },
}

/// Surface that records draw calls since the last clear
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Calls recorded since the last clear
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of times the surface was cleared
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            style: *style,
        });
    }

    fn stroke_rect(&mut self, origin: Point, extent: Point, style: &StrokeStyle) {
        self.ops.push(DrawOp::Rect {
            origin,
            extent,
            style: *style,
        });
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &StrokeStyle) {
        self.ops.push(DrawOp::Ellipse {
            center,
            rx,
            ry,
            style: *style,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, style: &StrokeStyle) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            style: *style,
        });
    }

    fn draw_text(&mut self, text: &str, baseline: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            baseline,
            style: *style,
        });
    }

    fn blit(&mut self, _source: &RgbaImage, origin: Point, extent: Point) {
        self.ops.push(DrawOp::Blit { origin, extent });
    }
}
