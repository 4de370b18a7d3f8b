use crate::media::{DownloadError, MediaFile};
use axum::{
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned to HTTP callers as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method not allowed".to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Not found".to_string(),
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        if err.is_client_error() {
            debug!("Rejected request: {}", err);
            return ApiError::bad_request(err.to_string());
        }

        error!("Download failed: {}", err);
        match err {
            // The tool reported success but the file could not be read back
            DownloadError::Read(_) => ApiError::internal("Failed to read downloaded file"),
            other => ApiError::internal(format!("Download failed: {other}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Sends the whole file as an attachment.
pub fn file_response(file: MediaFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    let length = file.data.len().to_string();

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, file.content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
            (CONTENT_LENGTH, length),
        ],
        file.data,
    )
        .into_response()
}
