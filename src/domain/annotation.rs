//! Annotation model
//!
//! Annotations are a flat enumeration over the seven kinds. Each kind shares
//! a small set of policies (snap rules, exported fields) that are plain
//! functions over the variant data rather than a class hierarchy.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use image::RgbaImage;

use super::point::Point;
use crate::render::pixelate;

/// Default font size for text annotations
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Default pixel block size for blur annotations
pub const DEFAULT_PIXEL_SIZE: u32 = 5;

/// Closed set of annotation kinds; the wire tag and the tool name are the same
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Text,
    Line,
    Arrow,
    Highlight,
    Box,
    Circle,
    Blur,
}

impl AnnotationKind {
    /// Registry order, also used for tool shortcuts
    pub const ALL: [AnnotationKind; 7] = [
        AnnotationKind::Text,
        AnnotationKind::Line,
        AnnotationKind::Arrow,
        AnnotationKind::Highlight,
        AnnotationKind::Box,
        AnnotationKind::Circle,
        AnnotationKind::Blur,
    ];

    /// Tag written in the serialized form
    pub fn tag(self) -> &'static str {
        match self {
            AnnotationKind::Text => "Text",
            AnnotationKind::Line => "Line",
            AnnotationKind::Arrow => "Arrow",
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Box => "Box",
            AnnotationKind::Circle => "Circle",
            AnnotationKind::Blur => "Blur",
        }
    }

    /// Name shown in the annotation listing
    pub fn display_name(self) -> &'static str {
        self.tag()
    }

    /// Fields written by the codec for this kind
    pub fn export_properties(self) -> &'static [&'static str] {
        match self {
            AnnotationKind::Text => &["start", "text"],
            // Circle draws a different primitive when snapped, so the flag
            // itself is part of the stored shape.
            AnnotationKind::Circle => &["start", "last", "lastSnap"],
            AnnotationKind::Line
            | AnnotationKind::Arrow
            | AnnotationKind::Highlight
            | AnnotationKind::Box
            | AnnotationKind::Blur => &["start", "last"],
        }
    }

    /// Look up a kind by its tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether the kind is edited through a pointer drag (vs. a text overlay)
    pub fn is_drag(self) -> bool {
        !matches!(self, AnnotationKind::Text)
    }

    /// Build a fresh instance of this kind anchored at `start`
    pub fn create(self, ctx: &AnnotationContext, start: Point) -> Annotation {
        match self {
            AnnotationKind::Text => Annotation::Text(TextAnnotation::new(start, ctx.font_size)),
            AnnotationKind::Line => Annotation::Line(DragAnnotation::new(start)),
            AnnotationKind::Arrow => Annotation::Arrow(DragAnnotation::new(start)),
            AnnotationKind::Highlight => Annotation::Highlight(DragAnnotation::new(start)),
            AnnotationKind::Box => Annotation::Box(DragAnnotation::new(start)),
            AnnotationKind::Circle => Annotation::Circle(DragAnnotation::new(start)),
            AnnotationKind::Blur => {
                Annotation::Blur(BlurAnnotation::new(start, &ctx.source, ctx.pixel_size))
            }
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a tool or tag name is not a registered kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown annotation kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for AnnotationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// What a new annotation needs from the editor it is created in
#[derive(Clone, Debug)]
pub struct AnnotationContext {
    /// Full-resolution source bitmap (never modified)
    pub source: Rc<RgbaImage>,
    /// Blur block size
    pub pixel_size: u32,
    /// Text annotation font size
    pub font_size: f64,
}

impl AnnotationContext {
    pub fn new(source: Rc<RgbaImage>) -> Self {
        Self {
            source,
            pixel_size: DEFAULT_PIXEL_SIZE,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size.max(1);
        self
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }
}

/// A single annotation field value, as seen by the codec
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Point(Point),
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Why a field could not be assigned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The kind has no such field
    Unknown,
    /// The field exists but the value has the wrong shape
    WrongType,
}

/// Text written on the image
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub start: Point,
    pub text: String,
    pub font_size: f64,
}

impl TextAnnotation {
    pub fn new(start: Point, font_size: f64) -> Self {
        Self {
            start,
            text: String::new(),
            font_size,
        }
    }
}

/// Shared state of the pointer-drag kinds (line, arrow, highlight, box, circle)
#[derive(Clone, Debug, PartialEq)]
pub struct DragAnnotation {
    pub start: Point,
    /// Most recent pointer location, `None` until the pointer moved
    pub last: Option<Point>,
    /// Whether the snap modifier was held on the most recent move
    pub last_snap: bool,
}

impl DragAnnotation {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            last: None,
            last_snap: false,
        }
    }
}

/// Pixelated region backed by a blocky copy of the source image
#[derive(Clone)]
pub struct BlurAnnotation {
    pub start: Point,
    pub last: Option<Point>,
    pixel_size: u32,
    pixelated: Rc<RgbaImage>,
}

impl BlurAnnotation {
    /// Precompute the pixelated copy of `source`; `source` itself is untouched
    pub fn new(start: Point, source: &RgbaImage, pixel_size: u32) -> Self {
        Self {
            start,
            last: None,
            pixel_size,
            pixelated: Rc::new(pixelate::pixelate(source, pixel_size)),
        }
    }

    /// The precomputed pixelated copy
    pub fn pixelated(&self) -> &RgbaImage {
        &self.pixelated
    }
}

impl PartialEq for BlurAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.last == other.last && self.pixel_size == other.pixel_size
    }
}

impl fmt::Debug for BlurAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlurAnnotation")
            .field("start", &self.start)
            .field("last", &self.last)
            .field("pixel_size", &self.pixel_size)
            .field(
                "pixelated",
                &format_args!("{}x{}", self.pixelated.width(), self.pixelated.height()),
            )
            .finish()
    }
}

/// One annotation of any kind
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Text(TextAnnotation),
    Line(DragAnnotation),
    Arrow(DragAnnotation),
    Highlight(DragAnnotation),
    Box(DragAnnotation),
    Circle(DragAnnotation),
    Blur(BlurAnnotation),
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Text(_) => AnnotationKind::Text,
            Annotation::Line(_) => AnnotationKind::Line,
            Annotation::Arrow(_) => AnnotationKind::Arrow,
            Annotation::Highlight(_) => AnnotationKind::Highlight,
            Annotation::Box(_) => AnnotationKind::Box,
            Annotation::Circle(_) => AnnotationKind::Circle,
            Annotation::Blur(_) => AnnotationKind::Blur,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Point where the gesture began
    pub fn start(&self) -> Point {
        match self {
            Annotation::Text(t) => t.start,
            Annotation::Line(d)
            | Annotation::Arrow(d)
            | Annotation::Highlight(d)
            | Annotation::Box(d)
            | Annotation::Circle(d) => d.start,
            Annotation::Blur(b) => b.start,
        }
    }

    /// End point of drag kinds
    pub fn last(&self) -> Option<Point> {
        match self {
            Annotation::Text(_) => None,
            Annotation::Line(d)
            | Annotation::Arrow(d)
            | Annotation::Highlight(d)
            | Annotation::Box(d)
            | Annotation::Circle(d) => d.last,
            Annotation::Blur(b) => b.last,
        }
    }

    /// Whether the gesture produced something worth keeping
    ///
    /// Text needs content; drag kinds need at least one pointer move.
    pub fn is_committable(&self) -> bool {
        match self {
            Annotation::Text(t) => !t.text.is_empty(),
            _ => self.last().is_some(),
        }
    }

    /// Update a drag kind with a new pointer position
    ///
    /// The snap decision is resolved here so that rendering stays free of
    /// side effects. Text ignores pointer movement.
    pub fn drag_to(&mut self, position: Point, snap: bool) {
        match self {
            Annotation::Text(_) => {}
            Annotation::Line(d) | Annotation::Arrow(d) | Annotation::Highlight(d) => {
                d.last_snap = snap;
                d.last = Some(if snap {
                    snap_to_axis(d.start, position)
                } else {
                    position
                });
            }
            Annotation::Box(d) => {
                d.last_snap = snap;
                d.last = Some(if snap {
                    snap_to_square(d.start, position)
                } else {
                    position
                });
            }
            Annotation::Circle(d) => {
                d.last_snap = snap;
                d.last = Some(position);
            }
            Annotation::Blur(b) => b.last = Some(position),
        }
    }

    /// Read a named field, using the wire names
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match (self, name) {
            (_, "start") => Some(FieldValue::Point(self.start())),
            (Annotation::Text(t), "text") => Some(FieldValue::Text(t.text.clone())),
            (Annotation::Text(t), "font_size") => Some(FieldValue::Number(t.font_size)),
            (Annotation::Text(_), _) => None,
            (_, "last") => self.last().map(FieldValue::Point),
            (Annotation::Blur(_), _) => None,
            (Annotation::Line(d), "lastSnap")
            | (Annotation::Arrow(d), "lastSnap")
            | (Annotation::Highlight(d), "lastSnap")
            | (Annotation::Box(d), "lastSnap")
            | (Annotation::Circle(d), "lastSnap") => Some(FieldValue::Bool(d.last_snap)),
            _ => None,
        }
    }

    /// Assign a named field, using the wire names
    pub fn assign(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (self, name, value) {
            (Annotation::Text(t), "start", FieldValue::Point(p)) => t.start = p,
            (Annotation::Text(t), "text", FieldValue::Text(s)) => t.text = s,
            (Annotation::Text(t), "font_size", FieldValue::Number(n)) => t.font_size = n,
            (Annotation::Text(_), "start" | "text" | "font_size", _) => {
                return Err(FieldError::WrongType);
            }
            (Annotation::Text(_), _, _) => return Err(FieldError::Unknown),
            (Annotation::Blur(b), "start", FieldValue::Point(p)) => b.start = p,
            (Annotation::Blur(b), "last", FieldValue::Point(p)) => b.last = Some(p),
            (Annotation::Blur(_), "start" | "last", _) => return Err(FieldError::WrongType),
            (Annotation::Blur(_), _, _) => return Err(FieldError::Unknown),
            (
                Annotation::Line(d)
                | Annotation::Arrow(d)
                | Annotation::Highlight(d)
                | Annotation::Box(d)
                | Annotation::Circle(d),
                name,
                value,
            ) => match (name, value) {
                ("start", FieldValue::Point(p)) => d.start = p,
                ("last", FieldValue::Point(p)) => d.last = Some(p),
                ("lastSnap", FieldValue::Bool(b)) => d.last_snap = b,
                ("start" | "last" | "lastSnap", _) => return Err(FieldError::WrongType),
                _ => return Err(FieldError::Unknown),
            },
        }
        Ok(())
    }
}

/// Constrain `position` to the axis through `start` it is closest to
///
/// Vertical when the drag is taller than it is wide, horizontal otherwise.
pub fn snap_to_axis(start: Point, position: Point) -> Point {
    let (dx, dy) = position.subtract(start).xy();
    if dx.abs() < dy.abs() {
        Point::new(start.x, position.y)
    } else {
        Point::new(position.x, start.y)
    }
}

/// Constrain `position` so that start→position spans a square
///
/// The side is the shorter of the two extents; the drag direction is kept.
pub fn snap_to_square(start: Point, position: Point) -> Point {
    let (dx, dy) = position.subtract(start).xy();
    let side = dx.abs().min(dy.abs());
    Point::new(start.x + sign(dx) * side, start.y + sign(dy) * side)
}

/// Sign of `v`, zero for zero
fn sign(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v.signum() }
}
