//! Caption and footer text rasterisation.

use std::fs;
use std::ops::Deref;
use std::path::Path;

use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle, VerticalAlign,
};
use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};

use super::layout::Rect;
use crate::models::error::BoothError;

pub const CAPTION_FONT_SIZE: f32 = 24.0;
pub const FOOTER_FONT_SIZE: f32 = 18.0;

/// DejaVu Sans Condensed Bold, used unless a font path overrides it.
static BUNDLED_FONT: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSansCondensed-Bold.ttf"));

/// Draws centred single-line text for the caption and footer bands.
pub struct TextRenderer {
    font: Font,
}

impl TextRenderer {
    /// Renderer backed by the font shipped with the crate.
    pub fn bundled() -> Result<Self, BoothError> {
        Self::from_bytes(BUNDLED_FONT)
    }

    pub fn from_bytes<D: Deref<Target = [u8]>>(bytes: D) -> Result<Self, BoothError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| BoothError::ConfigurationFailed(format!("failed to parse font: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> Result<Self, BoothError> {
        let bytes = fs::read(path).map_err(|e| {
            BoothError::ConfigurationFailed(format!("failed to read font {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    /// `font_path` when given, the bundled font otherwise.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, BoothError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    /// Draw `text` centred horizontally and vertically inside `band`.
    pub fn draw_centered(&self, canvas: &mut RgbaImage, band: Rect, text: &str, size: f32, color: Rgba<u8>) {
        if text.is_empty() {
            return;
        }

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: band.x as f32,
            y: band.y as f32,
            max_width: Some(band.width as f32),
            max_height: Some(band.height as f32),
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Middle,
            ..LayoutSettings::default()
        });
        layout.append(&[&self.font], &TextStyle::new(text, size, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (_, coverage) = self.font.rasterize_config(glyph.key);
            blend_coverage(
                canvas,
                glyph.x.round() as i64,
                glyph.y.round() as i64,
                glyph.width,
                &coverage,
                color,
            );
        }
    }
}

/// Blend an 8-bit coverage bitmap of `width` columns onto the canvas.
pub(crate) fn blend_coverage(
    canvas: &mut RgbaImage,
    left: i64,
    top: i64,
    width: usize,
    coverage: &[u8],
    color: Rgba<u8>,
) {
    if width == 0 {
        return;
    }
    let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);

    for (i, &alpha) in coverage.iter().enumerate() {
        if alpha == 0 {
            continue;
        }
        let x = left + (i % width) as i64;
        let y = top + (i / width) as i64;
        if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
            continue;
        }

        let dst = canvas.get_pixel_mut(x as u32, y as u32);
        let a = alpha as u32;
        for c in 0..3 {
            dst[c] = ((color[c] as u32 * a + dst[c] as u32 * (255 - a)) / 255) as u8;
        }
        dst[3] = dst[3].max(alpha);
    }
}
