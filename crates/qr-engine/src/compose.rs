//! Image composition: module raster, logo overlay, logo outline, PNG output.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::color::Background;
use crate::encode::QrSymbol;
use crate::{QrEngineError, Result};

/// Rasterize a symbol: one `box_size` square per module, quiet zone included.
pub fn render_modules(symbol: &QrSymbol, fill: Rgba<u8>, background: Background) -> RgbaImage {
    let size = symbol.pixel_size();
    let scale = symbol.box_size;
    let offset = symbol.border * scale;
    let modules = symbol.matrix.width();

    let mut img = RgbaImage::from_pixel(size, size, background.pixel());

    for y in 0..modules {
        for x in 0..modules {
            if !symbol.matrix.is_dark(x, y) {
                continue;
            }
            let px = offset + x as u32 * scale;
            let py = offset + y as u32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, fill);
                }
            }
        }
    }

    debug!(size, modules, scale, "Rendered QR modules");
    img
}

/// Decode logo bytes into an RGBA image.
pub fn decode_logo(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| QrEngineError::Asset(format!("logo: {e}")))
}

/// Clamp a requested logo edge to what fits on `canvas`.
pub fn clamp_logo_size(canvas: &RgbaImage, size: u32) -> u32 {
    let max = canvas.width().min(canvas.height());
    if size > max {
        warn!(requested = size, max, "Logo larger than QR image, clamping");
        max
    } else {
        size
    }
}

/// Top-left corner that centres a `size` square on the canvas.
fn centred_origin(canvas: &RgbaImage, size: u32) -> (u32, u32) {
    (
        (canvas.width() / 2).saturating_sub(size / 2),
        (canvas.height() / 2).saturating_sub(size / 2),
    )
}

/// Resize `logo` to `size`×`size` and paste it centred, masked by its alpha.
pub fn paste_logo(canvas: &mut RgbaImage, logo: &DynamicImage, size: u32) {
    let size = clamp_logo_size(canvas, size);
    if size == 0 {
        return;
    }
    let resized = logo.resize_exact(size, size, FilterType::Lanczos3);
    let (x, y) = centred_origin(canvas, size);
    debug!(size, x, y, "Pasting logo");
    overlay(canvas, &resized, x, y);
}

/// Outline the logo area in `color`, pushed outward by
/// `round(size * percent / 100)` pixels on each side.
pub fn draw_logo_border(canvas: &mut RgbaImage, size: u32, percent: u32, color: Rgba<u8>) {
    if percent == 0 {
        return;
    }
    let size = clamp_logo_size(canvas, size);
    let gap = (size as f32 * percent as f32 / 100.0).round() as i32;
    let cx = (canvas.width() / 2) as i32;
    let cy = (canvas.height() / 2) as i32;
    let half = (size / 2) as i32;

    let left = cx - half - gap;
    let top = cy - half - gap;
    let right = cx + half + gap;
    let bottom = cy + half + gap;

    let rect = Rect::at(left, top).of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
    draw_hollow_rect_mut(canvas, rect, color);
}

/// Alpha-composite `top` onto `base` at the given position.
///
/// Fully transparent source pixels leave the base untouched.
pub fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, *pixel);
            } else if alpha > 0.01 {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_pixel(bg, pixel, alpha);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        (fg[3] as f32 * alpha + bg[3] as f32 * inv) as u8,
    ])
}

/// Serialize to PNG, keeping the alpha channel.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}
