use std::sync::Arc;

use ab_glyph::FontArc;
use link_preview::PreviewFetcher;

use crate::config::AppConfig;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    /// HTTP client for link previews
    fetcher: PreviewFetcher,
    /// Caption font, if one could be loaded at startup
    caption_font: Option<FontArc>,
}

impl SharedState {
    /// Build state from loaded config. A missing caption font is not fatal:
    /// renders without a caption still work.
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        let fetcher = PreviewFetcher::new(config.preview_timeout())?;
        let caption_font = match qr_engine::load_caption_font(config.caption_font_path.as_deref())
        {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("Captions disabled: {e}");
                None
            }
        };
        Ok(Self::from_parts(config, fetcher, caption_font))
    }

    pub fn from_parts(
        config: AppConfig,
        fetcher: PreviewFetcher,
        caption_font: Option<FontArc>,
    ) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                fetcher,
                caption_font,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn fetcher(&self) -> &PreviewFetcher {
        &self.inner.fetcher
    }

    pub fn caption_font(&self) -> Option<&FontArc> {
        self.inner.caption_font.as_ref()
    }
}
