//! Scan pipeline: decode upload, detect symbols, annotate, preview links.

use link_preview::{Preview, PreviewError, PreviewFetcher};
use qr_engine::{DetectedSymbol, QrEngineError};

/// Preview attempt for one distinct URL payload.
#[derive(Debug)]
pub struct PreviewOutcome {
    pub url: String,
    pub result: Result<Preview, PreviewError>,
}

/// Everything produced by scanning one upload.
#[derive(Debug)]
pub struct ScanReport {
    pub symbols: Vec<DetectedSymbol>,
    /// PNG of the upload with detection boxes drawn on a copy.
    pub annotated_png: Vec<u8>,
    pub previews: Vec<PreviewOutcome>,
}

impl ScanReport {
    pub fn detected(&self) -> bool {
        !self.symbols.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Engine(#[from] QrEngineError),

    #[error("Image analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Decode, detect and annotate on the blocking pool.
async fn analyze(bytes: Vec<u8>) -> Result<(Vec<DetectedSymbol>, Vec<u8>), ScanError> {
    let result = tokio::task::spawn_blocking(move || {
        let image = qr_engine::decode_image(&bytes)?;
        let symbols = qr_engine::detect(&image);
        let annotated = qr_engine::annotate(&image, &symbols);
        let png = qr_engine::compose::encode_png(&annotated)?;
        Ok::<_, QrEngineError>((symbols, png))
    })
    .await??;
    Ok(result)
}

/// Scan an uploaded image and preview every distinct HTTP(S) payload once.
///
/// Previews run one after another; a failed preview is recorded and does
/// not abort the scan.
pub async fn scan_upload(
    bytes: Vec<u8>,
    fetcher: &PreviewFetcher,
) -> Result<ScanReport, ScanError> {
    let (symbols, annotated_png) = analyze(bytes).await?;

    let mut urls: Vec<String> = Vec::new();
    for symbol in &symbols {
        if let Some(url) = symbol.http_url() {
            let url = url.to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
    }

    let mut previews = Vec::with_capacity(urls.len());
    for url in urls {
        let result = fetcher.fetch_preview(&url).await;
        if let Err(e) = &result {
            tracing::warn!(url = %url, "Link preview failed: {e}");
        }
        previews.push(PreviewOutcome { url, result });
    }

    tracing::info!(
        symbols = symbols.len(),
        previews = previews.len(),
        "Scan finished"
    );
    Ok(ScanReport {
        symbols,
        annotated_png,
        previews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_engine::{QrRequest, RgbaImage, render};
    use std::time::Duration;

    fn fetcher() -> PreviewFetcher {
        PreviewFetcher::new(Some(Duration::from_secs(2))).unwrap()
    }

    fn png_of(data: &str) -> Vec<u8> {
        render(&QrRequest::new(data).with_layout(6, 4), None)
            .unwrap()
            .to_png()
            .unwrap()
    }

    #[tokio::test]
    async fn image_without_code_reports_nothing() {
        let canvas = RgbaImage::from_pixel(120, 80, qr_engine::color::WHITE);
        let blank = qr_engine::compose::encode_png(&canvas).unwrap();
        let report = scan_upload(blank, &fetcher()).await.unwrap();
        assert!(!report.detected());
        assert!(report.previews.is_empty());
        assert!(!report.annotated_png.is_empty());
    }

    #[tokio::test]
    async fn text_payload_is_not_previewed() {
        let report = scan_upload(png_of("just some text"), &fetcher())
            .await
            .unwrap();
        assert!(report.detected());
        assert_eq!(report.symbols[0].payload_text(), "just some text");
        assert!(report.previews.is_empty());
    }

    #[tokio::test]
    async fn unreachable_link_yields_failed_preview() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let report = scan_upload(png_of(&url), &fetcher()).await.unwrap();
        assert_eq!(report.previews.len(), 1);
        assert_eq!(report.previews[0].url, url);
        assert!(report.previews[0].result.is_err());
    }

    #[tokio::test]
    async fn repeated_link_is_previewed_once() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let code = qr_engine::decode_image(&png_of(&url)).unwrap();
        let mut canvas = RgbaImage::from_pixel(
            code.width() * 2,
            code.height(),
            qr_engine::color::WHITE,
        );
        qr_engine::compose::overlay(&mut canvas, &code, 0, 0);
        qr_engine::compose::overlay(&mut canvas, &code, code.width(), 0);
        let upload = qr_engine::compose::encode_png(&canvas).unwrap();

        let report = scan_upload(upload, &fetcher()).await.unwrap();
        assert_eq!(report.symbols.len(), 2);
        assert_eq!(report.previews.len(), 1);
        assert_eq!(report.previews[0].url, url);
    }

    #[tokio::test]
    async fn non_image_upload_is_a_decoding_error() {
        let err = scan_upload(b"plain text".to_vec(), &fetcher())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Engine(QrEngineError::Decoding(_))));
    }
}
