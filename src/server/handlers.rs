use super::{
    response::{file_response, ApiError},
    AppState,
};
use crate::media::{DownloadRequest, Platform};
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    #[serde(default)]
    pub url: String,
    /// `audio` or `video`; anything else is rejected after the URL check.
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct LegacyDownloadBody {
    #[serde(default)]
    pub url: String,
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/download/{platform}
pub async fn download(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let platform = platform
        .parse::<Platform>()
        .map_err(ApiError::bad_request)?;
    let body: DownloadBody = parse_body(&body)?;

    let request = DownloadRequest::parse(platform, &body.url, &body.kind)?;
    let file = state.downloader.download(&request).await?;
    Ok(file_response(file))
}

/// POST /api/download - older clients only ever asked for Instagram audio.
pub async fn legacy_download(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body: LegacyDownloadBody = parse_body(&body)?;

    let request = DownloadRequest::parse(Platform::Instagram, &body.url, "audio")?;
    let file = state.downloader.download(&request).await?;
    Ok(file_response(file))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}
