//! QR rendering API:
//!   POST /api/qr – multipart form in, PNG out

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::Response;
use serde::Deserialize;

use crate::app::SharedState;
use crate::services::form::build_request;

use super::{ApiError, engine_err, err_json, read_form};

#[derive(Debug, Default, Deserialize)]
pub struct QrQuery {
    download: Option<String>,
}

impl QrQuery {
    fn wants_attachment(&self) -> bool {
        matches!(self.download.as_deref(), Some("1" | "true"))
    }
}

/// POST /api/qr
pub async fn render_qr(
    State(state): State<SharedState>,
    Query(query): Query<QrQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = read_form(multipart).await?;
    let icon = form.files.remove("icon");
    render_png(&state, &form.fields, icon, query.wants_attachment()).await
}

/// Render the form into a PNG response.
pub async fn render_png(
    state: &SharedState,
    fields: &HashMap<String, String>,
    icon: Option<Vec<u8>>,
    attachment: bool,
) -> Result<Response, ApiError> {
    let request = build_request(fields, icon).map_err(|e| engine_err(&e))?;
    let font = state.caption_font().cloned();

    let png = tokio::task::spawn_blocking(move || {
        qr_engine::render(&request, font.as_ref()).and_then(|r| r.to_png())
    })
    .await
    .map_err(|e| err_json(500, &e.to_string()))?
    .map_err(|e| engine_err(&e))?;

    let disposition = format!(
        "{}; filename=\"{}\"",
        if attachment { "attachment" } else { "inline" },
        qr_engine::SUGGESTED_FILENAME
    );
    Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(png))
        .map_err(|e| err_json(500, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use link_preview::PreviewFetcher;

    fn state() -> SharedState {
        SharedState::from_parts(
            AppConfig::default(),
            PreviewFetcher::new(None).unwrap(),
            None,
        )
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn renders_png_inline() {
        let form = fields(&[("link", "https://example.com")]);
        let response = render_png(&state(), &form, None, false).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "inline; filename=\"qr_code.png\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"\x89PNG"));
        let symbols = qr_engine::detect(&qr_engine::decode_image(&body).unwrap());
        assert_eq!(symbols[0].payload, b"https://example.com");
    }

    #[tokio::test]
    async fn download_uses_attachment_disposition() {
        let response = render_png(&state(), &fields(&[("link", "x")]), None, true)
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"qr_code.png\""
        );
    }

    #[tokio::test]
    async fn empty_link_is_a_bad_request() {
        let (status, body) = render_png(&state(), &fields(&[("link", "")]), None, false)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn caption_without_font_is_a_bad_request() {
        let (status, _) = render_png(
            &state(),
            &fields(&[("link", "x"), ("name", "Alice")]),
            None,
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn download_flag_parsing() {
        let q = |v: Option<&str>| QrQuery {
            download: v.map(String::from),
        };
        assert!(q(Some("1")).wants_attachment());
        assert!(q(Some("true")).wants_attachment());
        assert!(!q(Some("0")).wants_attachment());
        assert!(!q(None).wants_attachment());
    }
}
