//! Region cropping of a captured screenshot
//!
//! The crop box is dragged from `start`; its dimensions are negative when the
//! drag went up or to the left.

use image::RgbaImage;

use crate::domain::{Point, Rect};

/// Crop `image` to the box dragged from `start` by `dimensions`
///
/// The box is clipped to the image. Returns `None` when nothing is left.
pub fn crop_region(image: &RgbaImage, start: Point, dimensions: Point) -> Option<RgbaImage> {
    let region = Rect::from_origin_extent(start, dimensions)
        .intersect(Rect::bounds(image.width(), image.height()))?;
    let dims = region.dimensions()?;
    log::debug!(
        "Cropping {}x{} at ({}, {})",
        dims.width(),
        dims.height(),
        region.left,
        region.top
    );
    Some(
        image::imageops::crop_imm(
            image,
            region.left as u32,
            region.top as u32,
            dims.width(),
            dims.height(),
        )
        .to_image(),
    )
}

/// The "upload without cropping" path: the whole capture
pub fn full_region(image: &RgbaImage) -> (Point, Point) {
    (
        Point::new(0.0, 0.0),
        Point::new(f64::from(image.width()), f64::from(image.height())),
    )
}
