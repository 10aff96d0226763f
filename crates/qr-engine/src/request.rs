//! Render requests: every styling input for one QR image in one value.

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use tracing::info;

use crate::color::{BLACK, Background};
use crate::compose;
use crate::encode::{ErrorCorrection, encode};
use crate::text;
use crate::{QrEngineError, Result};

/// Suggested download name for rendered codes.
pub const SUGGESTED_FILENAME: &str = "qr_code.png";

/// Logo to place in the centre of the code.
#[derive(Debug, Clone)]
pub struct LogoSpec {
    /// Encoded image file (PNG/JPEG).
    pub bytes: Vec<u8>,
    /// Edge length in pixels after resizing.
    pub size: u32,
    /// Outline offset as a percentage of `size`; 0 disables the outline.
    pub border_percent: u32,
}

/// Immutable description of one QR rendering.
#[derive(Debug, Clone)]
pub struct QrRequest {
    pub data: String,
    pub box_size: u32,
    pub border: u32,
    pub fill: Rgba<u8>,
    pub background: Background,
    pub error_correction: ErrorCorrection,
    pub logo: Option<LogoSpec>,
    pub caption: Option<String>,
}

impl QrRequest {
    /// Black on white, box size 10, border 4, level L.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            box_size: 10,
            border: 4,
            fill: BLACK,
            background: Background::WHITE,
            error_correction: ErrorCorrection::Low,
            logo: None,
            caption: None,
        }
    }

    pub fn with_layout(mut self, box_size: u32, border: u32) -> Self {
        self.box_size = box_size;
        self.border = border;
        self
    }

    pub fn with_colors(mut self, fill: Rgba<u8>, background: Background) -> Self {
        self.fill = fill;
        self.background = background;
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrection) -> Self {
        self.error_correction = level;
        self
    }

    pub fn with_logo(mut self, logo: LogoSpec) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Blank captions are ignored.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = (!caption.trim().is_empty()).then_some(caption);
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(logo) = &self.logo {
            if logo.size == 0 {
                return Err(QrEngineError::Validation("logo size must be at least 1".into()));
            }
            if logo.border_percent > 100 {
                return Err(QrEngineError::Validation(
                    "logo border must be between 0 and 100 percent".into(),
                ));
            }
        }
        Ok(())
    }
}

/// A rendered code, owned by the caller.
#[derive(Debug, Clone)]
pub struct RenderedQr {
    pub image: RgbaImage,
}

impl RenderedQr {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        compose::encode_png(&self.image)
    }
}

/// Encode and compose a request into an RGBA image.
///
/// `font` is only needed when the request carries a caption.
pub fn render(request: &QrRequest, font: Option<&FontArc>) -> Result<RenderedQr> {
    request.validate()?;

    let symbol = encode(
        &request.data,
        request.box_size,
        request.border,
        request.error_correction,
    )?;
    let mut image = compose::render_modules(&symbol, request.fill, request.background);

    if let Some(logo) = &request.logo {
        let decoded = compose::decode_logo(&logo.bytes)?;
        compose::paste_logo(&mut image, &decoded, logo.size);
        compose::draw_logo_border(&mut image, logo.size, logo.border_percent, request.fill);
    }

    if let Some(caption) = &request.caption {
        let font = font.ok_or_else(|| {
            QrEngineError::Asset("a caption was requested but no font is available".into())
        })?;
        text::draw_caption(&mut image, font, caption, request.fill);
    }

    info!(
        size = image.width(),
        logo = request.logo.is_some(),
        caption = request.caption.is_some(),
        "Rendered QR code"
    );
    Ok(RenderedQr { image })
}
