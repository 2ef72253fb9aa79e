//! Glyph rasterisation for text annotations using rusttype

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusttype::{Font, Scale, point};

/// Fonts probed when no font is configured
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded sans-serif font
pub struct GlyphRenderer {
    font: Font<'static>,
}

impl GlyphRenderer {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    /// Load a TrueType/OpenType font file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font: {}", path.display()))?;
        Self::from_bytes(bytes)
            .with_context(|| format!("Not a usable font file: {}", path.display()))
    }

    /// Load the configured font, falling back to well known system fonts
    pub fn discover(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::load(path) {
                Ok(glyphs) => return Some(glyphs),
                Err(err) => log::warn!("{:#}", err),
            }
        }
        FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .filter(|path| path.exists())
            .find_map(|path| match Self::load(&path) {
                Ok(glyphs) => {
                    log::debug!("Using font {}", path.display());
                    Some(glyphs)
                }
                Err(err) => {
                    log::debug!("{:#}", err);
                    None
                }
            })
    }

    /// Call `plot(x, y, coverage)` for every pixel covered by `text`
    ///
    /// `baseline` is the left end of the text baseline.
    pub fn rasterize(
        &self,
        text: &str,
        size: f32,
        baseline: (f32, f32),
        mut plot: impl FnMut(i32, i32, f32),
    ) {
        let scale = Scale::uniform(size);
        for glyph in self.font.layout(text, scale, point(baseline.0, baseline.1)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                if coverage > 0.0 {
                    plot(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage);
                }
            });
        }
    }
}
