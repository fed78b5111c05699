//! Upload HTTP Handlers
//!
//! multipart 字段 `file` 写入对象存储，成功后返回公开地址

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::application::{UploadFile, UploadFileResponse, UploadKind};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedFileView {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

impl From<UploadFileResponse> for UploadedFileView {
    fn from(response: UploadFileResponse) -> Self {
        Self {
            key: response.key,
            url: response.url,
            size: response.size,
            content_type: response.content_type,
        }
    }
}

/// 上传章节文本文件
pub async fn upload_chapter_text(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<UploadedFileView>>, ApiError> {
    upload(&state, user, multipart?, UploadKind::ChapterText).await
}

/// 上传封面图片
pub async fn upload_cover(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<UploadedFileView>>, ApiError> {
    upload(&state, user, multipart?, UploadKind::CoverImage).await
}

async fn upload(
    state: &AppState,
    user: CurrentUser,
    mut multipart: Multipart,
    kind: UploadKind,
) -> Result<Json<ApiResponse<UploadedFileView>>, ApiError> {
    let command = read_file_field(&mut multipart, kind).await?;

    let response = state.upload_file_handler.handle(command).await?;

    tracing::debug!(user_id = %user.id, key = %response.key, "Upload owner");

    Ok(Json(ApiResponse::success(response.into())))
}

async fn read_file_field(
    multipart: &mut Multipart,
    kind: UploadKind,
) -> Result<UploadFile, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        return Ok(UploadFile {
            kind,
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(ApiError::BadRequest("File is required".to_string()))
}
