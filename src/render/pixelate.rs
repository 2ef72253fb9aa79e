//! Blur precomputation
//!
//! The whole source is shrunk by the block factor and scaled back up without
//! smoothing, giving a blocky copy that blur annotations crop from.

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Build the pixelated copy of `source` for a block size of `pixel_size`
pub fn pixelate(source: &RgbaImage, pixel_size: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    let block = pixel_size.max(1);
    if width == 0 || height == 0 || block == 1 {
        return source.clone();
    }
    // Blocks are exactly `block` wide only when it divides the size; otherwise
    // the partial edge block is spread over the row.
    let small = imageops::resize(
        source,
        width.div_ceil(block),
        height.div_ceil(block),
        FilterType::Triangle,
    );
    imageops::resize(&small, width, height, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use image::Rgba;

    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 20) as u8, (y * 20) as u8, ((x + y) * 7) as u8, 255])
        })
    }

    #[test]
    fn test_keeps_dimensions() {
        let out = pixelate(&gradient(12, 7), 5);
        assert_eq!(out.dimensions(), (12, 7));
    }

    #[test]
    fn test_solid_image_stays_solid() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([40, 80, 120, 255]));
        let out = pixelate(&source, 5);
        assert!(out.pixels().all(|p| *p == Rgba([40, 80, 120, 255])));
    }

    #[test]
    fn test_colour_count_bounded_by_blocks() {
        let out = pixelate(&gradient(10, 10), 5);
        let colours: HashSet<_> = out.pixels().map(|p| p.0).collect();
        assert!(colours.len() <= 4, "found {} colours", colours.len());
    }

    #[test]
    fn test_blocks_align_to_grid() {
        let out = pixelate(&gradient(10, 10), 5);
        for (x, y, p) in out.enumerate_pixels() {
            assert_eq!(*p, *out.get_pixel(x / 5 * 5, y / 5 * 5), "pixel {x},{y}");
        }
        assert_ne!(out.get_pixel(0, 0), out.get_pixel(5, 5));
    }

    #[test]
    fn test_source_untouched() {
        let source = gradient(10, 10);
        let before = source.clone();
        let _ = pixelate(&source, 5);
        assert_eq!(source, before);
    }

    #[test]
    fn test_block_of_one_is_identity() {
        let source = gradient(6, 6);
        assert_eq!(pixelate(&source, 1), source);
    }
}
