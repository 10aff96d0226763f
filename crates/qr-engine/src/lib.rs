//! QR code rendering and scanning.
//!
//! Encodes link text into a module matrix, composes it into a styled RGBA
//! image (colors, transparent background, centred logo, caption), and
//! locates/decodes QR symbols in uploaded images.

pub mod color;
pub mod compose;
pub mod detect;
pub mod encode;
pub mod request;
pub mod text;

// Re-exports for convenience
pub use image::{DynamicImage, RgbaImage};
pub use color::{Background, parse_hex_color};
pub use detect::{
    ANNOTATION_COLOR, ANNOTATION_STROKE, BoundingBox, DetectedSymbol, Symbology, annotate,
    decode_image, detect,
};
pub use encode::{ErrorCorrection, MAX_IMAGE_EDGE, ModuleMatrix, QrSymbol, encode};
pub use request::{LogoSpec, QrRequest, RenderedQr, SUGGESTED_FILENAME, render};
pub use text::{CAPTION_FONT_SIZE, CAPTION_MARGIN, load_caption_font};

/// Unified error type for the qr-engine crate.
#[derive(Debug, thiserror::Error)]
pub enum QrEngineError {
    /// Malformed user input (bad color, empty link, out-of-range size).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A logo, font or other asset could not be read.
    #[error("Unreadable asset: {0}")]
    Asset(String),

    /// The data does not fit into any QR version at the requested level.
    #[error("QR encode error: {0}")]
    Encoding(String),

    /// The uploaded bytes are not a readable image.
    #[error("Image decode error: {0}")]
    Decoding(String),

    /// Serializing the rendered image failed.
    #[error("PNG encode error: {0}")]
    Output(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, QrEngineError>;
