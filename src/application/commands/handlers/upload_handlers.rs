//! Upload Command Handlers
//!
//! 章节 TXT 与封面图片上传到对象存储

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::{UploadFile, UploadKind};
use crate::application::error::ApplicationError;
use crate::application::ports::ObjectStoragePort;
use crate::domain::slugify;

const TEXT_MIME_TYPES: &[&str] = &["text/plain"];
const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// 上传限制
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_chapter_text_bytes: usize,
    pub max_cover_image_bytes: usize,
    pub timeout: Duration,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_chapter_text_bytes: 1024 * 1024,
            max_cover_image_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

/// 上传结果
#[derive(Debug, Clone)]
pub struct UploadFileResponse {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

/// 去掉 `; charset=...` 等参数并转小写
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn image_mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn default_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "txt",
    }
}

/// 文件名规范化：主干转 slug，保留小写扩展名
fn sanitize_filename(filename: Option<&str>, content_type: &str) -> String {
    let name = filename
        .map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f))
        .unwrap_or("");
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem, ext.to_ascii_lowercase())
        }
        _ => (name, default_extension(content_type).to_string()),
    };
    let ext: String = ext.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let ext = if ext.is_empty() {
        default_extension(content_type).to_string()
    } else {
        ext
    };
    format!("{}.{}", slugify(stem), ext)
}

/// 判定最终的 MIME 类型，不接受时返回 None
fn resolve_content_type(kind: UploadKind, content_type: Option<&str>, filename: Option<&str>) -> Option<String> {
    let declared = content_type.map(essence).filter(|c| !c.is_empty());
    let ext = filename.and_then(extension_of);

    match kind {
        UploadKind::ChapterText => {
            let declared_ok = declared
                .as_deref()
                .is_some_and(|c| TEXT_MIME_TYPES.contains(&c));
            let ext_ok = ext.as_deref() == Some("txt");
            (declared_ok || ext_ok).then(|| "text/plain".to_string())
        }
        UploadKind::CoverImage => match declared {
            Some(c) if IMAGE_MIME_TYPES.contains(&c.as_str()) => Some(c),
            _ => ext
                .as_deref()
                .and_then(image_mime_for_extension)
                .map(str::to_string),
        },
    }
}

/// UploadFile Handler
pub struct UploadFileHandler {
    storage: Arc<dyn ObjectStoragePort>,
    limits: UploadLimits,
}

impl UploadFileHandler {
    pub fn new(storage: Arc<dyn ObjectStoragePort>, limits: UploadLimits) -> Self {
        Self { storage, limits }
    }

    pub async fn handle(&self, command: UploadFile) -> Result<UploadFileResponse, ApplicationError> {
        if command.data.is_empty() {
            return Err(ApplicationError::validation("uploaded file is empty"));
        }

        let max_bytes = match command.kind {
            UploadKind::ChapterText => self.limits.max_chapter_text_bytes,
            UploadKind::CoverImage => self.limits.max_cover_image_bytes,
        };
        if command.data.len() > max_bytes {
            return Err(ApplicationError::validation(format!(
                "file is {} bytes, limit is {} bytes",
                command.data.len(),
                max_bytes
            )));
        }

        let content_type = resolve_content_type(
            command.kind,
            command.content_type.as_deref(),
            command.filename.as_deref(),
        )
        .ok_or_else(|| {
            ApplicationError::validation(format!(
                "unsupported file type: {}",
                command.content_type.as_deref().unwrap_or("unknown")
            ))
        })?;

        if command.kind == UploadKind::ChapterText && std::str::from_utf8(&command.data).is_err() {
            return Err(ApplicationError::validation("chapter text must be UTF-8"));
        }

        let key = format!(
            "{}/{}-{}",
            command.kind.key_prefix(),
            Utc::now().timestamp_millis(),
            sanitize_filename(command.filename.as_deref(), &content_type)
        );

        let stored = tokio::time::timeout(
            self.limits.timeout,
            self.storage.put(&key, &command.data, &content_type),
        )
        .await
        .map_err(|_| ApplicationError::Timeout("Object upload"))??;

        tracing::info!(
            key = %stored.key,
            size = stored.size,
            content_type = %content_type,
            "File uploaded"
        );

        Ok(UploadFileResponse {
            key: stored.key,
            url: stored.url,
            size: stored.size,
            content_type,
        })
    }
}
