//! Per-kind draw rules
//!
//! Drawing never mutates the annotation; any snapping was resolved while the
//! gesture was live.

use super::Surface;
use super::geometry::{self, DEFAULT_STROKE, HIGHLIGHT_STROKE, arrow, shape};
use crate::domain::{Annotation, BlurAnnotation, DragAnnotation, Point, TextAnnotation};

/// Draw one annotation onto `surface`
///
/// Drag kinds that never received a pointer move draw nothing.
pub fn draw_annotation(surface: &mut dyn Surface, annotation: &Annotation) {
    match annotation {
        Annotation::Text(text) => draw_text(surface, text),
        Annotation::Line(line) => {
            if let Some(last) = line.last {
                surface.stroke_line(line.start, last, &DEFAULT_STROKE);
            }
        }
        Annotation::Arrow(line) => draw_arrow(surface, line),
        Annotation::Highlight(line) => {
            if let Some(last) = line.last {
                surface.stroke_line(line.start, last, &HIGHLIGHT_STROKE);
            }
        }
        Annotation::Box(rect) => {
            if let Some(last) = rect.last {
                surface.stroke_rect(rect.start, last.subtract(rect.start), &DEFAULT_STROKE);
            }
        }
        Annotation::Circle(circle) => draw_circle(surface, circle),
        Annotation::Blur(blur) => draw_blur(surface, blur),
    }
}

fn draw_text(surface: &mut dyn Surface, text: &TextAnnotation) {
    if text.text.is_empty() {
        return;
    }
    // `start` is the top-left of the overlay the text was typed into
    let baseline = Point::new(text.start.x, text.start.y + text.font_size);
    surface.draw_text(&text.text, baseline, &geometry::text_style(text.font_size));
}

fn draw_arrow(surface: &mut dyn Surface, line: &DragAnnotation) {
    let Some(last) = line.last else {
        return;
    };
    surface.stroke_line(line.start, last, &DEFAULT_STROKE);
    for head in arrow::head_points(line.start, last) {
        surface.stroke_line(line.start, head, &DEFAULT_STROKE);
    }
}

fn draw_circle(surface: &mut dyn Surface, circle: &DragAnnotation) {
    let Some(last) = circle.last else {
        return;
    };
    if circle.last_snap {
        let (center, radius) = shape::circle(circle.start, last);
        surface.stroke_circle(center, radius, &DEFAULT_STROKE);
    } else {
        let (center, rx, ry) = shape::oval(circle.start, last);
        surface.stroke_ellipse(center, rx, ry, &DEFAULT_STROKE);
    }
}

fn draw_blur(surface: &mut dyn Surface, blur: &BlurAnnotation) {
    if let Some(last) = blur.last {
        surface.blit(blur.pixelated(), blur.start, last.subtract(blur.start));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use image::RgbaImage;

    use super::*;
    use crate::domain::{AnnotationContext, AnnotationKind};
    use crate::render::record::{DisplayList, DrawOp};

    fn ctx() -> AnnotationContext {
        AnnotationContext::new(Rc::new(RgbaImage::new(40, 40)))
    }

    fn drawn(kind: AnnotationKind, to: Point, snap: bool) -> Vec<DrawOp> {
        let mut a = kind.create(&ctx(), Point::new(0.0, 0.0));
        a.drag_to(to, snap);
        let mut list = DisplayList::new(40, 40);
        draw_annotation(&mut list, &a);
        list.ops().to_vec()
    }

    #[test]
    fn test_line_is_one_segment() {
        let ops = drawn(AnnotationKind::Line, Point::new(10.0, 3.0), false);
        assert_eq!(
            ops,
            vec![DrawOp::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 3.0),
                style: DEFAULT_STROKE,
            }]
        );
    }

    #[test]
    fn test_arrow_draws_shaft_and_two_heads() {
        let ops = drawn(AnnotationKind::Arrow, Point::new(100.0, 0.0), false);
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[1],
            DrawOp::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(12.0, -9.0),
                style: DEFAULT_STROKE,
            }
        );
    }

    #[test]
    fn test_snapped_arrow_heads_use_snapped_end() {
        let ops = drawn(AnnotationKind::Arrow, Point::new(100.0, 4.0), true);
        assert_eq!(
            ops[2],
            DrawOp::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(12.0, 9.0),
                style: DEFAULT_STROKE,
            }
        );
    }

    #[test]
    fn test_highlight_style() {
        let ops = drawn(AnnotationKind::Highlight, Point::new(30.0, 0.0), false);
        assert!(matches!(ops[0], DrawOp::Line { style, .. } if style == HIGHLIGHT_STROKE));
    }

    #[test]
    fn test_box_extent() {
        let ops = drawn(AnnotationKind::Box, Point::new(10.0, 4.0), true);
        assert_eq!(
            ops,
            vec![DrawOp::Rect {
                origin: Point::new(0.0, 0.0),
                extent: Point::new(4.0, 4.0),
                style: DEFAULT_STROKE,
            }]
        );
    }

    #[test]
    fn test_circle_shape_depends_on_snap() {
        let oval = drawn(AnnotationKind::Circle, Point::new(20.0, 10.0), false);
        assert!(matches!(oval[0], DrawOp::Ellipse { .. }));
        let circle = drawn(AnnotationKind::Circle, Point::new(20.0, 10.0), true);
        assert!(matches!(circle[0], DrawOp::Circle { radius, .. } if radius == 10.0));
    }

    #[test]
    fn test_blur_blits_region() {
        let ops = drawn(AnnotationKind::Blur, Point::new(8.0, 6.0), false);
        assert_eq!(
            ops,
            vec![DrawOp::Blit {
                origin: Point::new(0.0, 0.0),
                extent: Point::new(8.0, 6.0),
            }]
        );
    }

    #[test]
    fn test_text_baseline_offset_by_font_size() {
        let mut a = AnnotationKind::Text.create(&ctx(), Point::new(5.0, 5.0));
        a.assign("text", crate::domain::FieldValue::Text("hello".into()))
            .unwrap();
        let mut list = DisplayList::new(40, 40);
        draw_annotation(&mut list, &a);
        assert!(matches!(
            &list.ops()[0],
            DrawOp::Text { text, baseline, .. } if text == "hello" && *baseline == Point::new(5.0, 23.0)
        ));
    }

    #[test]
    fn test_undragged_shapes_draw_nothing() {
        let mut list = DisplayList::new(40, 40);
        for kind in AnnotationKind::ALL {
            draw_annotation(&mut list, &kind.create(&ctx(), Point::default()));
        }
        assert!(list.ops().is_empty());
    }
}
