//! Static file serving for the single-page UI (web/).

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "web/"]
struct PageAssets;

/// Serve the page for bare `/` requests.
pub async fn index() -> Response {
    serve_embedded::<PageAssets>("index.html")
}

/// Fallback handler: unknown API paths get JSON 404, everything else the page.
pub async fn fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if is_api_path(request_path) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": request_path,
            })),
        )
            .into_response();
    }

    serve_embedded::<PageAssets>(request_path.trim_start_matches('/'))
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn serve_embedded<E: Embed>(path: &str) -> Response {
    let (path, asset) = match E::get(path) {
        Some(asset) => (path, Some(asset)),
        None => ("index.html", E::get("index.html")),
    };

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::{fallback, index, is_api_path};
    use axum::body::to_bytes;
    use axum::http::{StatusCode, Uri, header};

    #[test]
    fn should_detect_api_paths_by_root_segment() {
        for path in ["/api", "/api/qr", "/api/nonexistent"] {
            assert!(is_api_path(path), "{path} should be an API path");
        }
        for path in ["/", "/apiary", "/index.html"] {
            assert!(!is_api_path(path), "{path} should not be an API path");
        }
    }

    #[tokio::test]
    async fn fallback_returns_404_json_for_api() {
        let response = fallback(Uri::from_static("/api/nonexistent")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], "/api/nonexistent");
    }

    #[tokio::test]
    async fn index_serves_html_page() {
        let response = index().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("/api/qr"));
    }

    #[tokio::test]
    async fn page_tolerates_non_json_errors_and_typed_images() {
        let body = to_bytes(index().await.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("async function errorMessage(resp)"));
        assert!(!page.contains("(await resp.json()).error"));
        assert!(page.contains("p.image_type"));
        assert!(!page.contains("'data:image;base64,'"));
    }

    #[tokio::test]
    async fn unknown_page_path_falls_back_to_index() {
        let response = fallback(Uri::from_static("/some/page")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
    }
}
