use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::{api, assets};
use crate::app::SharedState;
use crate::config::AppConfig;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.config().max_upload_bytes;
    let cors = cors_layer(state.config());

    let router = Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- QR ---
        .route("/api/qr", post(api::qr::render_qr))
        .route("/api/scan", post(api::scan::scan_image))
        // --- Page ---
        .route("/", get(assets::index))
        .fallback(assets::fallback)
        // --- Middleware ---
        .layer(DefaultBodyLimit::max(body_limit));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.with_state(state)
}

/// CORS for the configured origins only. The page itself is same-origin, so
/// without configured origins no CORS headers are sent at all.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, "Ignoring CORS origin: {e}");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    tracing::info!(origins = ?config.cors_allowed_origins, "CORS enabled");
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
