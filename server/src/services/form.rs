//! Turn submitted form fields into a [`QrRequest`].

use std::collections::HashMap;
use std::ops::RangeInclusive;

use qr_engine::{Background, ErrorCorrection, LogoSpec, QrEngineError, QrRequest, parse_hex_color};

pub const BOX_SIZE: RangeInclusive<u32> = 1..=20;
pub const BORDER: RangeInclusive<u32> = 0..=10;
pub const ICON_SIZE: RangeInclusive<u32> = 10..=40;
pub const ICON_BORDER: RangeInclusive<u32> = 0..=50;

const DEFAULT_BOX_SIZE: u32 = 10;
const DEFAULT_BORDER: u32 = 4;
const DEFAULT_ICON_SIZE: u32 = 20;
const DEFAULT_ICON_BORDER: u32 = 10;
const DEFAULT_FILL: &str = "#000000";
const DEFAULT_CUSTOM_BACK: &str = "#000000";

/// Background choice offered by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackMode {
    White,
    Transparent,
    Custom,
}

impl BackMode {
    fn parse(value: &str) -> Result<Self, QrEngineError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "white" => Ok(Self::White),
            "transparent" => Ok(Self::Transparent),
            "custom" => Ok(Self::Custom),
            other => Err(QrEngineError::Validation(format!(
                "back_mode must be white, transparent or custom (got '{other}')"
            ))),
        }
    }
}

/// Build a render request from multipart text fields and an optional icon.
pub fn build_request(
    fields: &HashMap<String, String>,
    icon: Option<Vec<u8>>,
) -> Result<QrRequest, QrEngineError> {
    let field = |name: &str| fields.get(name).map(|v| v.trim()).unwrap_or("");

    let link = field("link");
    if link.is_empty() {
        return Err(QrEngineError::Validation("link must not be empty".into()));
    }

    let box_size = ranged(field("box_size"), "box_size", BOX_SIZE, DEFAULT_BOX_SIZE)?;
    let border = ranged(field("border"), "border", BORDER, DEFAULT_BORDER)?;
    let fill = parse_hex_color(or_default(field("fill_color"), DEFAULT_FILL))?;

    let background = match BackMode::parse(field("back_mode"))? {
        BackMode::White => Background::WHITE,
        BackMode::Transparent => Background::Transparent,
        BackMode::Custom => Background::Opaque(parse_hex_color(or_default(
            field("back_color"),
            DEFAULT_CUSTOM_BACK,
        ))?),
    };

    let error_correction = match field("error_correction") {
        "" => ErrorCorrection::default(),
        level => level.parse()?,
    };

    let mut request = QrRequest::new(link)
        .with_layout(box_size, border)
        .with_colors(fill, background)
        .with_error_correction(error_correction)
        .with_caption(field("name"));

    if let Some(bytes) = icon.filter(|b| !b.is_empty()) {
        request = request.with_logo(LogoSpec {
            bytes,
            size: ranged(field("icon_size"), "icon_size", ICON_SIZE, DEFAULT_ICON_SIZE)?,
            border_percent: ranged(
                field("icon_border"),
                "icon_border",
                ICON_BORDER,
                DEFAULT_ICON_BORDER,
            )?,
        });
    }

    Ok(request)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

fn ranged(
    value: &str,
    name: &str,
    range: RangeInclusive<u32>,
    default: u32,
) -> Result<u32, QrEngineError> {
    if value.is_empty() {
        return Ok(default);
    }
    let v: u32 = value
        .parse()
        .map_err(|_| QrEngineError::Validation(format!("{name} must be an integer")))?;
    if !range.contains(&v) {
        return Err(QrEngineError::Validation(format!(
            "{name} must be between {} and {}",
            range.start(),
            range.end()
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_engine::color::{Rgba, WHITE};

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn minimal_form_uses_defaults() {
        let req = build_request(&fields(&[("link", "https://example.com")]), None).unwrap();
        assert_eq!(req.data, "https://example.com");
        assert_eq!((req.box_size, req.border), (10, 4));
        assert_eq!(req.background, Background::Opaque(WHITE));
        assert_eq!(req.error_correction, ErrorCorrection::Low);
        assert!(req.logo.is_none());
        assert!(req.caption.is_none());
    }

    #[test]
    fn empty_link_is_rejected() {
        let err = build_request(&fields(&[("link", "  ")]), None).unwrap_err();
        assert!(matches!(err, QrEngineError::Validation(_)));
    }

    #[test]
    fn background_modes() {
        let req = build_request(
            &fields(&[("link", "x"), ("back_mode", "transparent")]),
            None,
        )
        .unwrap();
        assert_eq!(req.background, Background::Transparent);

        let req = build_request(
            &fields(&[("link", "x"), ("back_mode", "custom"), ("back_color", "#112233")]),
            None,
        )
        .unwrap();
        assert_eq!(
            req.background,
            Background::Opaque(Rgba([0x11, 0x22, 0x33, 255]))
        );

        assert!(build_request(&fields(&[("link", "x"), ("back_mode", "plaid")]), None).is_err());
    }

    #[test]
    fn out_of_range_sliders_are_rejected() {
        for (name, value) in [("box_size", "0"), ("box_size", "21"), ("border", "11")] {
            let err = build_request(&fields(&[("link", "x"), (name, value)]), None).unwrap_err();
            assert!(matches!(err, QrEngineError::Validation(_)), "{name}={value}");
        }
    }

    #[test]
    fn icon_fields_only_apply_with_icon() {
        let f = fields(&[("link", "x"), ("icon_size", "99")]);
        assert!(build_request(&f, None).is_ok());
        assert!(build_request(&f, Some(vec![1, 2, 3])).is_err());

        let f = fields(&[("link", "x"), ("icon_size", "30"), ("icon_border", "25")]);
        let logo = build_request(&f, Some(vec![1])).unwrap().logo.unwrap();
        assert_eq!((logo.size, logo.border_percent), (30, 25));
    }

    #[test]
    fn empty_icon_upload_is_ignored() {
        let req = build_request(&fields(&[("link", "x")]), Some(Vec::new())).unwrap();
        assert!(req.logo.is_none());
    }

    #[test]
    fn malformed_fill_color_is_rejected() {
        let err =
            build_request(&fields(&[("link", "x"), ("fill_color", "#zzz")]), None).unwrap_err();
        assert!(matches!(err, QrEngineError::Validation(_)));
    }

    #[test]
    fn name_becomes_caption() {
        let req = build_request(&fields(&[("link", "x"), ("name", "Alice")]), None).unwrap();
        assert_eq!(req.caption.as_deref(), Some("Alice"));
    }
}
