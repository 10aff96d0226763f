//! HTTP side of the preview: page GET, then og:image GET.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::metadata::extract_metadata;
use crate::{Preview, PreviewError};

const USER_AGENT: &str = concat!("qr-studio/", env!("CARGO_PKG_VERSION"));

/// Reusable preview client.
#[derive(Debug, Clone)]
pub struct PreviewFetcher {
    http: reqwest::Client,
}

impl PreviewFetcher {
    /// Build a fetcher. `None` leaves requests without a timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, PreviewError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wrap an already configured client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch `url` and build a preview from its metadata.
    ///
    /// The page and the og:image are fetched one after the other. Any
    /// failure fails the whole preview; a page without og:image yields a
    /// preview without image.
    pub async fn fetch_preview(&self, url: &str) -> Result<Preview, PreviewError> {
        let page_url = Url::parse(url.trim())?;
        if !matches!(page_url.scheme(), "http" | "https") {
            return Err(PreviewError::UnsupportedScheme(page_url.scheme().to_string()));
        }

        debug!(url = %page_url, "Fetching page for preview");
        let resp = self.http.get(page_url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(
                url = %page_url,
                status = status.as_u16(),
                "Preview page returned error status"
            );
            return Err(PreviewError::Status(status.as_u16()));
        }
        let final_url = resp.url().clone();
        let body = resp.text().await?;

        let meta = extract_metadata(&body, &final_url)?;

        let (image, image_type) = match &meta.image_url {
            Some(image_url) => {
                let (bytes, content_type) = self.fetch_image(image_url).await?;
                (Some(bytes), content_type)
            }
            None => (None, None),
        };

        info!(
            url = %page_url,
            title = %meta.title,
            has_image = image.is_some(),
            "Built link preview"
        );
        Ok(Preview {
            url: page_url.to_string(),
            title: meta.title,
            description: meta.description,
            image_url: meta.image_url.map(|u| u.to_string()),
            image,
            image_type,
        })
    }

    async fn fetch_image(&self, url: &Url) -> Result<(Vec<u8>, Option<String>), PreviewError> {
        debug!(url = %url, "Fetching og:image");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PreviewError::ImageFetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PreviewError::ImageFetch(format!("status {}", status.as_u16())));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(image_mime);

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| PreviewError::ImageFetch(e.to_string()))?;
        Ok((bytes.to_vec(), content_type))
    }
}

/// Bare `image/*` MIME type from a `Content-Type` value, parameters dropped.
fn image_mime(value: &str) -> Option<String> {
    let mime = value.split(';').next()?.trim().to_ascii_lowercase();
    (mime.starts_with("image/") && mime.len() > "image/".len()).then_some(mime)
}
