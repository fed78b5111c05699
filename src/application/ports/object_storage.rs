//! Object Storage Port - 出站端口
//!
//! 上传文件（章节文本、封面）的对象存储抽象

use async_trait::async_trait;
use thiserror::Error;

/// 对象存储错误
#[derive(Debug, Error)]
pub enum ObjectStorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 已存储对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// 可公开访问的 URL
    pub url: String,
    pub size: u64,
}

/// Object Storage Port
#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// 写入对象（同 key 覆盖）
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, ObjectStorageError>;

    /// 对象的公开 URL
    fn public_url(&self, key: &str) -> String;
}
