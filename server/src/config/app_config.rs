//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::get_default;
use super::validation::{split_list, validate_setting};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub bind_address: String,
    /// Zero means no timeout.
    pub preview_timeout_secs: u64,
    pub caption_font_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Cross-origin callers allowed to use the API; empty means none.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or invalid values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String {
            let default = get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(v) => match validate_setting(key, v.trim()) {
                    Ok(()) => v.trim().to_string(),
                    Err(e) => {
                        tracing::warn!(key, value = %v, "Invalid setting ({e}), using default");
                        default.to_string()
                    }
                },
                None => default.to_string(),
            }
        };

        let font = g("CAPTION_FONT_PATH");
        Self {
            server_port: g("SERVER_PORT").parse().unwrap_or(8080),
            bind_address: g("BIND_ADDRESS"),
            preview_timeout_secs: g("PREVIEW_TIMEOUT_SECS").parse().unwrap_or(10),
            caption_font_path: (!font.is_empty()).then(|| PathBuf::from(font)),
            max_upload_bytes: g("MAX_UPLOAD_BYTES").parse().unwrap_or(20 * 1024 * 1024),
            cors_allowed_origins: split_list(&g("CORS_ALLOWED_ORIGINS"))
                .map(String::from)
                .collect(),
        }
    }

    /// Timeout for preview requests, `None` when disabled.
    pub fn preview_timeout(&self) -> Option<Duration> {
        (self.preview_timeout_secs > 0).then(|| Duration::from_secs(self.preview_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.preview_timeout(), Some(Duration::from_secs(10)));
        assert!(config.caption_font_path.is_none());
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            " http://localhost:3000 ,https://qr.example.com,",
        )]);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "https://qr.example.com"]
        );

        let config = config_from(&[("CORS_ALLOWED_ORIGINS", "*")]);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("SERVER_PORT", "9000"),
            ("PREVIEW_TIMEOUT_SECS", "0"),
            ("CAPTION_FONT_PATH", "/tmp/font.ttf"),
        ]);
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.preview_timeout(), None);
        assert_eq!(config.caption_font_path, Some(PathBuf::from("/tmp/font.ttf")));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[("SERVER_PORT", "not-a-port"), ("MAX_UPLOAD_BYTES", "1")]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }
}
