//! QR symbol detection in uploaded images.
//!
//! Locates every QR grid in an image with `rqrr`, decodes the payload bytes
//! and reports an axis-aligned bounding box per symbol. Annotation draws the
//! boxes onto a copy; the source image is never modified.

use std::fmt;

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, info};
use url::Url;

use crate::{QrEngineError, Result};

/// Outline color for detected symbols.
pub const ANNOTATION_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Outline stroke width in pixels.
pub const ANNOTATION_STROKE: u32 = 3;

/// Barcode family reported by the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbology {
    QrCode,
    Other(String),
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::QrCode => f.write_str("QRCODE"),
            Symbology::Other(name) => f.write_str(name),
        }
    }
}

/// Axis-aligned box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing all `points`, clipped at zero.
    fn enclosing(points: &[(i32, i32)]) -> Self {
        let min_x = points.iter().map(|p| p.0).min().unwrap_or(0).max(0);
        let min_y = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let max_x = points.iter().map(|p| p.0).max().unwrap_or(0).max(min_x);
        let max_y = points.iter().map(|p| p.1).max().unwrap_or(0).max(min_y);
        Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        }
    }
}

/// One decoded symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSymbol {
    pub bounds: BoundingBox,
    pub payload: Vec<u8>,
    pub symbology: Symbology,
}

impl DetectedSymbol {
    /// Payload as text, with invalid UTF-8 replaced.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// The payload as an HTTP(S) URL, if it is a QR code holding one.
    pub fn http_url(&self) -> Option<Url> {
        if self.symbology != Symbology::QrCode {
            return None;
        }
        let text = std::str::from_utf8(&self.payload).ok()?;
        let url = Url::parse(text.trim()).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

/// Decode uploaded bytes (PNG/JPEG) into an image.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| QrEngineError::Decoding(e.to_string()))
}

/// Find and decode every QR symbol in `image`.
///
/// An image without symbols yields an empty vector.
pub fn detect(image: &DynamicImage) -> Vec<DetectedSymbol> {
    let luma = image.to_luma8();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
        luma.get_pixel(x as u32, y as u32)[0]
    });
    let grids = prepared.detect_grids();
    debug!(width = w, height = h, grids = grids.len(), "Located QR grids");

    let mut symbols = Vec::with_capacity(grids.len());
    for grid in grids {
        let mut payload = Vec::new();
        if let Err(e) = grid.decode_to(&mut payload) {
            debug!(error = %e, "Skipping undecodable QR grid");
            continue;
        }
        let corners: Vec<(i32, i32)> = grid.bounds.iter().map(|p| (p.x, p.y)).collect();
        symbols.push(DetectedSymbol {
            bounds: BoundingBox::enclosing(&corners),
            payload,
            symbology: Symbology::QrCode,
        });
    }

    info!(count = symbols.len(), "QR detection finished");
    symbols
}

/// Copy `source` and outline each symbol's bounding box.
pub fn annotate(source: &DynamicImage, symbols: &[DetectedSymbol]) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let half = (ANNOTATION_STROKE / 2) as i32;

    for symbol in symbols {
        let b = symbol.bounds;
        for i in 0..ANNOTATION_STROKE as i32 {
            let grow = i - half;
            let width = b.width as i32 + 1 + 2 * grow;
            let height = b.height as i32 + 1 + 2 * grow;
            if width <= 0 || height <= 0 {
                continue;
            }
            let rect = Rect::at(b.x as i32 - grow, b.y as i32 - grow)
                .of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut canvas, rect, ANNOTATION_COLOR);
        }
    }
    canvas
}
