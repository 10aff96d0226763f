//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

const DEFS: &[(&str, &str, &str)] = &[
    ("SERVER_PORT", "8080", "HTTP port"),
    ("BIND_ADDRESS", "0.0.0.0", "Interface the HTTP server binds to"),
    (
        "PREVIEW_TIMEOUT_SECS",
        "10",
        "Per-request timeout for link previews; 0 disables it",
    ),
    ("CAPTION_FONT_PATH", "", "TTF/OTF used for captions; empty = system font"),
    ("MAX_UPLOAD_BYTES", "20971520", "Upper bound for uploaded logos and scans"),
    (
        "CORS_ALLOWED_ORIGINS",
        "",
        "Comma-separated origins allowed to call the API; empty = same-origin only",
    ),
];

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
