//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_ORIGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[A-Za-z0-9\-\.\[\]:]+$").unwrap());
static RE_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-\.]*[A-Za-z0-9])?$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "BIND_ADDRESS" => {
            if value.parse::<std::net::IpAddr>().is_err() && !RE_HOST.is_match(value) {
                return Err("must be an IP address or host name".into());
            }
        }
        "PREVIEW_TIMEOUT_SECS" => validate_int_range(value, 0, 300)?,
        "MAX_UPLOAD_BYTES" => validate_int_range(value, 1024, 200 * 1024 * 1024)?,
        "CAPTION_FONT_PATH" => {
            if !value.is_empty() && !has_font_extension(value) {
                return Err("must point to a .ttf or .otf file".into());
            }
        }
        "CORS_ALLOWED_ORIGINS" => {
            if let Some(bad) = split_list(value).find(|o| !RE_ORIGIN.is_match(o)) {
                return Err(format!("'{bad}' is not an origin like https://example.com"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Non-empty entries of a comma-separated setting.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn has_font_extension(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}
