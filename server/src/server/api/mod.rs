//! REST API handlers.

pub mod qr;
pub mod scan;

use std::collections::HashMap;

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use qr_engine::QrEngineError;
use serde_json::{Value, json};

pub type ApiError = (StatusCode, Json<Value>);

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map engine errors to a user-visible response. Bad input is a 400.
pub fn engine_err(e: &QrEngineError) -> ApiError {
    let status = match e {
        QrEngineError::Validation(_)
        | QrEngineError::Asset(_)
        | QrEngineError::Encoding(_)
        | QrEngineError::Decoding(_) => 400,
        QrEngineError::Output(_) => 500,
    };
    tracing::debug!(status, "Request failed: {e}");
    err_json(status, &e.to_string())
}

/// Multipart body split into text fields and uploaded files.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<u8>>,
}

/// Keep the status axum picked for a broken multipart body (413 when the
/// body limit is hit).
fn multipart_err(e: MultipartError) -> ApiError {
    err_json(e.status().as_u16(), &e.body_text())
}

/// Drain a multipart body. Parts with a file name are treated as uploads.
pub async fn read_form(mut multipart: Multipart) -> Result<FormData, ApiError> {
    let mut form = FormData::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_err)?
    {
        let name = field.name().unwrap_or("").to_string();
        if field.file_name().is_some() {
            let data = field.bytes().await.map_err(multipart_err)?;
            form.files.insert(name, data.to_vec());
        } else {
            let text = field.text().await.map_err(multipart_err)?;
            form.fields.insert(name, text);
        }
    }
    Ok(form)
}
