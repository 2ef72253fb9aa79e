//! Point value type
//!
//! Points are stored and transported as the tagged tuple `["P", [x, y]]`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Tag used for Point values in the wire format
pub const POINT_TAG: &str = "P";

/// An x,y coordinate in canvas pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinates as an (x, y) pair
    pub fn xy(self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Coordinates as a (y, x) pair
    pub fn yx(self) -> (f64, f64) {
        (self.y, self.x)
    }

    /// Component-wise difference `self - other`
    pub fn subtract(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Tagged tuple form, `("P", [x, y])`
    pub fn serialize_tagged(self) -> (&'static str, [f64; 2]) {
        (POINT_TAG, [self.x, self.y])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.subtract(rhs)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize_tagged().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, [x, y]): (String, [f64; 2]) = Deserialize::deserialize(deserializer)?;
        if tag != POINT_TAG {
            return Err(de::Error::custom(format!(
                "expected point tag `{POINT_TAG}`, found `{tag}`"
            )));
        }
        Ok(Point::new(x, y))
    }
}
