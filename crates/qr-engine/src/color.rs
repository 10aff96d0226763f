//! Color parsing for fill and background colors.

use std::sync::LazyLock;

pub use image::Rgba;
use regex::Regex;

use crate::{QrEngineError, Result};

static RE_HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap()
});

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Background of the rendered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Opaque(Rgba<u8>),
    /// Background pixels get alpha 0; dark modules stay opaque.
    Transparent,
}

impl Background {
    pub const WHITE: Background = Background::Opaque(WHITE);

    /// Pixel value used for light modules and the quiet zone.
    pub fn pixel(&self) -> Rgba<u8> {
        match self {
            Background::Opaque(c) => *c,
            Background::Transparent => Rgba([255, 255, 255, 0]),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::WHITE
    }
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` into an RGBA color.
///
/// The leading `#` is optional and hex digits are case-insensitive.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let trimmed = value.trim();
    let caps = RE_HEX_COLOR
        .captures(trimmed)
        .ok_or_else(|| QrEngineError::Validation(format!("invalid color '{value}'")))?;
    let hex = &caps[1];

    let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
    let color = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
            Rgba([expand(0), expand(1), expand(2), 255])
        }
        6 => Rgba([
            channel(&hex[0..2]),
            channel(&hex[2..4]),
            channel(&hex[4..6]),
            255,
        ]),
        _ => Rgba([
            channel(&hex[0..2]),
            channel(&hex[2..4]),
            channel(&hex[4..6]),
            channel(&hex[6..8]),
        ]),
    };
    Ok(color)
}
