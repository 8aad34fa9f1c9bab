use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_image_upload;
use crate::core::state::AppState;
use crate::schemas::image::UploadResponse;
use crate::services::uploads::UploadStore;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/:filename", get(serve_image).delete(delete_image))
}

/// Request-body ceiling for the upload route. One megabyte above the
/// configured file cap so multipart framing never rejects a file the
/// streaming check in the handler would accept; the handler enforces the
/// exact limit.
pub(crate) fn body_limit(storage: &crate::core::config::StorageSettings) -> usize {
    (storage.max_upload_size_mb as usize + 1) * 1024 * 1024
}

async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        filename = field.file_name().map(|s| s.to_string());
        content_type = field.content_type().map(|s| s.to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
        {
            let next_size = bytes.len() as u64 + chunk.len() as u64;
            if next_size > max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File size exceeds {}MB limit",
                    state.settings().storage().max_upload_size_mb
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        file_bytes = Some(bytes);
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("Image file is required".to_string()))?;
    let filename = filename.unwrap_or_else(|| "image.jpg".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    validate_image_upload(
        &filename,
        &content_type,
        &state.settings().storage().allowed_image_extensions,
    )?;

    let stored = UploadStore::stored_name(&filename, &file_bytes);
    let size = file_bytes.len() as u64;

    let path = match state.uploads().save(&stored, &file_bytes).await {
        Ok(path) => path,
        Err(err) => {
            state.uploads().remove_if_exists(&state.uploads().root().join(&stored)).await;
            return Err(ApiError::internal(err, "Failed to store uploaded image"));
        }
    };

    // EXIF extraction is best-effort: a dead AI service must not fail the upload.
    let gps_data = match state.ai().extract_gps(&path.to_string_lossy(), &stored).await {
        Ok(gps) => gps,
        Err(err) => {
            tracing::warn!(error = %err, filename = %stored, "EXIF extraction unavailable");
            None
        }
    };

    let message = if gps_data.is_some() {
        "Image uploaded, GPS coordinates extracted".to_string()
    } else {
        "Image uploaded, no GPS data found".to_string()
    };

    let response = UploadResponse {
        success: true,
        image_url: format!("{}/images/{stored}", state.settings().api().api_prefix),
        filename: stored,
        size,
        mimetype: content_type,
        gps_data,
        message,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .uploads()
        .resolve(&filename)
        .map_err(|_| ApiError::Forbidden("Invalid filename"))?;

    let bytes = match state.uploads().read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Image not found".to_string()));
        }
        Err(err) => return Err(ApiError::internal(err, "Failed to read image")),
    };

    let mime = content_type_for(&filename);
    Ok(([(header::CONTENT_TYPE, mime)], bytes))
}

async fn delete_image(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(filename): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let path = state
        .uploads()
        .resolve(&filename)
        .map_err(|_| ApiError::Forbidden("Invalid filename"))?;

    let deleted = state
        .uploads()
        .delete(&path)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete image"))?;

    if !deleted {
        return Err(ApiError::NotFound("Image not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true, "message": "Image deleted" })))
}

fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageSettings;

    #[test]
    fn body_limit_clears_the_configured_file_cap() {
        let storage = StorageSettings {
            uploads_dir: "uploads".to_string(),
            max_upload_size_mb: 10,
            allowed_image_extensions: vec!["jpg".to_string()],
        };

        let limit = body_limit(&storage);
        // A file at exactly the cap must fit with multipart overhead to spare.
        assert!(limit > 10 * 1024 * 1024);
        assert_eq!(limit, 11 * 1024 * 1024);
    }

    #[test]
    fn content_type_matches_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("A.JPG"), "image/jpeg");
        assert_eq!(content_type_for("scan.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
