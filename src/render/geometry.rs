//! Shared geometry calculations and style constants for annotations
//!
//! Every surface draws with the same constants so that a preview and an
//! exported image agree.

use super::{LineCap, Rgba, StrokeStyle, TextStyle};
use crate::domain::Point;

/// Stroke used by line, arrow, box and circle
pub const DEFAULT_STROKE: StrokeStyle = StrokeStyle {
    width: 2.0,
    color: Rgba::RED,
    cap: LineCap::Butt,
};

/// Thick translucent yellow stroke of the highlighter
pub const HIGHLIGHT_STROKE: StrokeStyle = StrokeStyle {
    width: 15.0,
    // rgba(255, 255, 0, 0.35)
    color: Rgba::rgba(255, 255, 0, 89),
    cap: LineCap::Round,
};

/// Text style for a given font size
pub fn text_style(size: f64) -> TextStyle {
    TextStyle {
        size: size as f32,
        fill: Rgba::RED,
        outline: Rgba::WHITE,
        outline_width: 1.0,
    }
}

/// Arrow geometry constants
pub mod arrow {
    use super::Point;

    /// Length of each arrowhead stroke
    pub const HEAD_LENGTH: f64 = 15.0;
    /// Arrowhead angle from the shaft in degrees
    pub const HEAD_ANGLE_DEG: f64 = 35.0;

    /// End points of the two arrowhead strokes
    ///
    /// The head sits at `start` and opens towards `last`; coordinates are
    /// rounded to whole pixels.
    pub fn head_points(start: Point, last: Point) -> [Point; 2] {
        let line_angle = (last.y - start.y).atan2(last.x - start.x).to_degrees();
        [-HEAD_ANGLE_DEG, HEAD_ANGLE_DEG].map(|offset| {
            let angle = (line_angle + offset).to_radians();
            Point::new(
                (angle.cos() * HEAD_LENGTH + start.x).round(),
                (angle.sin() * HEAD_LENGTH + start.y).round(),
            )
        })
    }
}

/// Ellipse/circle geometry
pub mod shape {
    use super::Point;

    /// Oval radii are scaled so the outline tracks the pointer more closely
    pub const OVAL_RADIUS_FACTOR: f64 = 0.7;

    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;

    /// Centre and radii of the oval spanned by `start`→`last`
    pub fn oval(start: Point, last: Point) -> (Point, f64, f64) {
        let (width, height) = last.subtract(start).xy();
        (
            start.midpoint(last),
            width.abs() * OVAL_RADIUS_FACTOR,
            height.abs() * OVAL_RADIUS_FACTOR,
        )
    }

    /// Centre and radius of the snapped circle spanned by `start`→`last`
    pub fn circle(start: Point, last: Point) -> (Point, f64) {
        let (width, height) = last.subtract(start).xy();
        (start.midpoint(last), width.abs().max(height.abs()) / 2.0)
    }
}
