use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::services::omr_processor::{OmrOutcome, UploadPart};

// Room for multipart framing and small text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub(crate) fn router(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    Router::new()
        .route("/", post(process_omr))
        .layer(DefaultBodyLimit::max(body_limit))
}

async fn process_omr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = state.settings().upload();
    let max_upload_size_mb = upload.max_upload_size_mb;
    let max_bytes = upload.max_upload_bytes();
    let mut parts = Vec::new();
    let mut total_bytes: u64 = 0;
    let mut has_file = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("file").to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read upload".to_string()))?
        {
            total_bytes += chunk.len() as u64;
            if total_bytes > max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File size exceeds {max_upload_size_mb}MB limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        has_file |= file_name.is_some();
        parts.push(UploadPart { name, file_name, content_type, bytes });
    }

    if !has_file {
        return Err(ApiError::BadRequest("An OMR sheet image file is required".to_string()));
    }

    tracing::info!(
        parts = parts.len(),
        upload_bytes = total_bytes,
        endpoint = %state.omr().endpoint(),
        "Forwarding OMR sheet"
    );

    match state.omr().process(parts).await {
        Ok(OmrOutcome::Upstream(body)) => {
            Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
        }
        Ok(OmrOutcome::Synthetic(result)) => Ok(Json(result).into_response()),
        Err(err) => Err(ApiError::internal(err, "Failed to process OMR sheet")),
    }
}
