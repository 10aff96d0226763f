//! Caption rendering for QR images.
//!
//! The caption is drawn at a fixed pixel size, centred horizontally and
//! anchored to the bottom edge with a fixed margin.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, info};

use crate::{QrEngineError, Result};

/// Caption font size in pixels.
pub const CAPTION_FONT_SIZE: f32 = 30.0;

/// Gap between the caption baseline box and the bottom edge.
pub const CAPTION_MARGIN: u32 = 10;

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Height of one line of text (ascent to descent) at the given scale.
pub fn text_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent()).ceil() as u32
}

/// Draw `caption` centred horizontally near the bottom edge of `img`.
pub fn draw_caption(img: &mut RgbaImage, font: &impl Font, caption: &str, color: Rgba<u8>) {
    let scale = PxScale::from(CAPTION_FONT_SIZE);
    let width = measure_text_width(font, scale, caption) as i32;
    let height = text_height(font, scale) as i32;

    let x = (img.width() as i32 - width) / 2;
    let y = img.height() as i32 - height - CAPTION_MARGIN as i32;
    debug!(x, y, width, height, "Drawing caption");

    draw_text_mut(img, color, x, y, scale, font, caption);
}

/// Load the caption font.
///
/// Tries `custom_path` first, then a list of common system fonts.
pub fn load_caption_font(custom_path: Option<&Path>) -> Result<FontArc> {
    if let Some(path) = custom_path {
        let data = std::fs::read(path).map_err(|e| {
            QrEngineError::Asset(format!("cannot read font {}: {e}", path.display()))
        })?;
        return FontArc::try_from_vec(data).map_err(|_| {
            QrEngineError::Asset(format!("{} is not a TTF/OTF font", path.display()))
        });
    }

    for path in system_font_candidates() {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(data) {
                info!(path = %path, "Using system font for captions");
                return Ok(font);
            }
        }
    }
    Err(QrEngineError::Asset(
        "no usable caption font found (set CAPTION_FONT_PATH or install system fonts)".into(),
    ))
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
    }
}
