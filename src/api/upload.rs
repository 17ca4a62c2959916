//! Upload-and-convert endpoint
//!
//! `POST /upload` accepts one multipart `file` field, validates it,
//! persists it under `uploads/`, runs the external converter, and
//! responds with a download URL for the converted artifact under
//! `/converted/`. The request stays open until the converter exits or
//! its deadline passes; other requests are unaffected.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Multipart field name carrying the document
const FILE_FIELD: &str = "file";

/// Success payload for `POST /upload`
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Always true on this path
    pub success: bool,
    /// Human-readable status message
    pub message: String,
    /// URL the converted artifact is served from
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
    /// Converter stdout, trimmed
    pub log: String,
}

/// POST /upload handler
///
/// **Request:** multipart form with a single `file` field
/// **Response:** `{"success":true,"message":...,"downloadUrl":...,"log":...}`
///
/// **Errors:**
/// - 400: no `file` field, disallowed MIME type, oversize, or content
///   that is not an Office document (nothing is written to disk)
/// - 500: converter spawn failure, nonzero exit, or missing output file
/// - 504: converter deadline exceeded
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ConvertResponse>> {
    // Take the first `file` field; the endpoint accepts exactly one.
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            let original_name = field
                .file_name()
                .map(str::to_owned)
                .unwrap_or_else(|| "upload".to_string());
            let content_type = field.content_type().map(str::to_owned);
            let data = field.bytes().await?;
            upload = Some((original_name, content_type, data));
            break;
        }
    }

    let Some((original_name, content_type, data)) = upload else {
        return Err(ApiError::NoFileProvided);
    };

    state
        .policy
        .check(content_type.as_deref(), &data)
        .map_err(|err| {
            warn!(
                file = %original_name,
                content_type = content_type.as_deref().unwrap_or("none"),
                size = data.len(),
                "Upload rejected: {err}"
            );
            ApiError::Validation(err.to_string())
        })?;

    let stored = state.store.persist(&original_name, &data).await?;
    let (output_name, output_path) = state
        .store
        .output_for(&stored, &state.settings.converter.target_extension);

    info!(
        file = %stored.storage_name,
        size = stored.size,
        "Upload stored, starting conversion"
    );

    let output = match state.converter.convert(&stored.path, &output_path).await {
        Ok(output) => output,
        Err(err) => {
            warn!(file = %stored.storage_name, "Conversion failed: {err}");
            *state.last_error.write().await = Some(err.to_string());
            return Err(err.into());
        }
    };

    info!(file = %output_name, "Conversion succeeded");

    Ok(Json(ConvertResponse {
        success: true,
        message: "Converted successfully!".to_string(),
        download_url: format!("/converted/{}", output_name),
        log: output.stdout.trim().to_string(),
    }))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_document))
}
