//! Multipart upload route handler.
//!
//! Accepts one file field, stores it under the configured upload directory
//! with a generated name, and returns the public path. Files are served back
//! by the static `/uploads` route wired in `main`.

use axum::{Json, extract::Multipart, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Upload response: the public path of the stored file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
}

/// Store an uploaded file.
///
/// POST /api/upload (bearer, multipart)
///
/// # Errors
///
/// 400 if no `file` field is present, 500 if the file cannot be written.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_owned()))
            .filter(|ext| ext.chars().all(char::is_alphanumeric) && ext.len() <= 8);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        let file_name = match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_lowercase()),
            None => Uuid::new_v4().to_string(),
        };

        let upload_dir = &state.config().upload_dir;
        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(upload_dir.join(&file_name), &data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store upload: {e}")))?;

        tracing::info!(file = %file_name, bytes = data.len(), "file uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                success: true,
                message: "File uploaded successfully".to_string(),
                file_path: format!("/uploads/{file_name}"),
            }),
        ));
    }

    Err(AppError::Validation("no file provided".to_string()))
}
