//! Screenshot bitmaps: decoding sources and encoding PNG output

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Decode any format supported by `image` into RGBA8
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let rgba = image::open(path)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?
        .into_rgba8();
    log::debug!(
        "Screenshot loaded: {}x{} pixels from {}",
        rgba.width(),
        rgba.height(),
        path.display()
    );
    Ok(rgba)
}

/// Write `img` as a PNG file
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_png(io::BufWriter::new(file), img)
        .with_context(|| format!("Failed to encode PNG: {}", path.display()))
}

/// Encode `image` as 8-bit RGBA PNG into `w`
pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let img = RgbaImage::from_fn(4, 3, |x, y| image::Rgba([x as u8 * 50, y as u8 * 80, 7, 255]));

        save_png(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_buffer_has_png_signature() {
        let mut buffer = Vec::new();
        write_png(&mut buffer, &RgbaImage::new(2, 2)).unwrap();
        assert_eq!(&buffer[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_image(&dir.path().join("nope.png")).is_err());
    }
}
