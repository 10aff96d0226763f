//! Scan API:
//!   POST /api/scan – multipart `image` in, detection + previews JSON out

use axum::Json;
use axum::extract::{Multipart, State};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use link_preview::PreviewError;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::scan::{PreviewOutcome, ScanError, ScanReport, scan_upload};

use super::{ApiError, engine_err, err_json, read_form};

const DETECTED_MESSAGE: &str = "QR code detected!";
const NOT_DETECTED_MESSAGE: &str = "No QR code detected.";

/// POST /api/scan
pub async fn scan_image(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut form = read_form(multipart).await?;
    let bytes = form
        .files
        .remove("image")
        .ok_or_else(|| err_json(400, "No image file provided"))?;
    scan_json(&state, bytes).await
}

/// Run the scan pipeline and render the report as JSON.
pub async fn scan_json(state: &SharedState, bytes: Vec<u8>) -> Result<Json<Value>, ApiError> {
    let report = scan_upload(bytes, state.fetcher())
        .await
        .map_err(|e| match e {
            ScanError::Engine(e) => engine_err(&e),
            other => err_json(500, &other.to_string()),
        })?;
    Ok(Json(report_json(&report)))
}

fn report_json(report: &ScanReport) -> Value {
    let symbols: Vec<Value> = report
        .symbols
        .iter()
        .map(|s| {
            json!({
                "bounds": {
                    "x": s.bounds.x,
                    "y": s.bounds.y,
                    "width": s.bounds.width,
                    "height": s.bounds.height,
                },
                "payload": s.payload_text(),
                "symbology": s.symbology.to_string(),
                "url": s.http_url().map(|u| u.to_string()),
            })
        })
        .collect();

    let previews: Vec<Value> = report.previews.iter().map(preview_json).collect();
    let message = if report.detected() {
        DETECTED_MESSAGE
    } else {
        NOT_DETECTED_MESSAGE
    };

    json!({
        "detected": report.detected(),
        "message": message,
        "symbols": symbols,
        "annotated_png": BASE64.encode(&report.annotated_png),
        "previews": previews,
    })
}

fn preview_json(outcome: &PreviewOutcome) -> Value {
    match &outcome.result {
        Ok(p) => json!({
            "url": outcome.url,
            "ok": true,
            "title": p.title,
            "description": p.description,
            "image_url": p.image_url,
            "image_base64": p.image.as_ref().map(|b| BASE64.encode(b)),
            "image_type": p.image_type,
        }),
        Err(e) => json!({
            "url": outcome.url,
            "ok": false,
            "error": PreviewError::USER_MESSAGE,
            "detail": e.to_string(),
        }),
    }
}
