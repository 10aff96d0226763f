//! Link preview client.
//!
//! Fetches a web page, extracts its title, meta description and Open Graph
//! image, then downloads that image.

pub mod fetch;
pub mod metadata;

pub use fetch::PreviewFetcher;
pub use metadata::{PageMetadata, extract_metadata};

/// A successfully built preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Absolute `og:image` URL, when the page declares one.
    pub image_url: Option<String>,
    /// Raw bytes of the `og:image`.
    pub image: Option<Vec<u8>>,
    /// `Content-Type` the image was served with, when it names an image type.
    pub image_type: Option<String>,
}

/// Unified error type for the link-preview crate.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Page returned status {0}")]
    Status(u16),

    #[error("Page has no {0}")]
    MissingField(&'static str),

    #[error("Preview image could not be fetched: {0}")]
    ImageFetch(String),
}

impl PreviewError {
    /// Message shown to users when a preview cannot be built.
    pub const USER_MESSAGE: &'static str = "Failed to fetch website preview.";
}
