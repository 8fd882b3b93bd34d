//! Cover image upload endpoint

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{
    multipart::{MultipartError, MultipartRejection},
    Multipart,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Multipart field carrying the image
const COVER_FIELD: &str = "cover";

/// Multipart form accepted by the upload endpoint
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CoverUploadForm {
    /// JPEG or PNG image
    #[schema(value_type = String, format = Binary)]
    cover: Vec<u8>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverUploadResponse {
    /// Public URL of the stored image
    pub cover_url: String,
}

fn rejected(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadRejected("File too large".to_string())
    } else {
        AppError::UploadRejected(e.body_text())
    }
}

/// Upload a JPEG or PNG book cover (multipart field `cover`)
#[utoipa::path(
    post,
    path = "/api/books/upload-cover",
    tag = "books",
    request_body(content = CoverUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cover stored", body = CoverUploadResponse),
        (status = 400, description = "No file, wrong type or too large", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_cover(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<CoverUploadResponse>> {
    // Anything that is not a multipart form has no file in it
    let mut multipart =
        multipart.map_err(|_| AppError::UploadRejected("No file uploaded".to_string()))?;
    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        if field.name() != Some(COVER_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(rejected)?;

        let cover_url = state
            .services
            .uploads
            .store_cover(&file_name, content_type.as_deref(), &data)
            .await?;
        return Ok(Json(CoverUploadResponse { cover_url }));
    }

    Err(AppError::UploadRejected("No file uploaded".to_string()))
}
