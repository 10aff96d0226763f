//! QR symbol encoding.
//!
//! Thin wrapper around the `qrcode` crate that auto-selects the smallest
//! version fitting the data and exposes the result as a plain module matrix.

use std::str::FromStr;

use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::{QrEngineError, Result};

/// Largest rendered edge, quiet zone included, in pixels.
pub const MAX_IMAGE_EDGE: u32 = 8192;

/// QR error correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    #[default]
    Low,
    /// ~15% recovery.
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery.
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrEngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::Low),
            "M" | "MEDIUM" => Ok(Self::Medium),
            "Q" | "QUARTILE" => Ok(Self::Quartile),
            "H" | "HIGH" => Ok(Self::High),
            _ => Err(QrEngineError::Validation(format!(
                "unknown error correction level '{s}' (expected L, M, Q or H)"
            ))),
        }
    }
}

/// Square grid of QR modules, row-major, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from row-major module values.
    ///
    /// Returns `None` unless `dark.len() == width * width`.
    pub fn from_modules(width: usize, dark: Vec<bool>) -> Option<Self> {
        (dark.len() == width * width).then_some(Self { width, dark })
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}

/// An encoded symbol together with its raster layout.
#[derive(Debug, Clone)]
pub struct QrSymbol {
    pub matrix: ModuleMatrix,
    /// Pixels per module edge.
    pub box_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
}

impl QrSymbol {
    /// Edge length of the rendered image in pixels.
    ///
    /// Symbols built by [`encode`] are guaranteed to fit in `u32`.
    pub fn pixel_size(&self) -> u32 {
        checked_edge(self.matrix.width(), self.box_size, self.border).unwrap_or(u32::MAX)
    }
}

fn checked_edge(modules: usize, box_size: u32, border: u32) -> Option<u32> {
    u32::try_from(modules)
        .ok()?
        .checked_add(border.checked_mul(2)?)?
        .checked_mul(box_size)
}

/// Encode `data` into the smallest QR version that fits at `ec`.
pub fn encode(data: &str, box_size: u32, border: u32, ec: ErrorCorrection) -> Result<QrSymbol> {
    if data.is_empty() {
        return Err(QrEngineError::Validation("link must not be empty".into()));
    }
    if box_size == 0 {
        return Err(QrEngineError::Validation("box size must be at least 1".into()));
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), ec.into())
        .map_err(|e| QrEngineError::Encoding(e.to_string()))?;
    let width = code.width();
    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();

    debug!(len = data.len(), modules = width, ?ec, "Encoded QR symbol");

    match checked_edge(width, box_size, border) {
        Some(edge) if edge <= MAX_IMAGE_EDGE => {}
        _ => {
            return Err(QrEngineError::Validation(format!(
                "box size {box_size} with border {border} exceeds {MAX_IMAGE_EDGE} px per side"
            )));
        }
    }

    let matrix = ModuleMatrix::from_modules(width, dark)
        .ok_or_else(|| QrEngineError::Encoding("encoder returned a non-square matrix".into()))?;
    Ok(QrSymbol {
        matrix,
        box_size,
        border,
    })
}
