//! Content Fetcher Port - 外部章节文本拉取
//!
//! 具体实现在 infrastructure/adapters 层（reqwest）

use async_trait::async_trait;
use thiserror::Error;

/// 拉取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Content fetch timed out")]
    Timeout,

    #[error("Invalid content URL: {0}")]
    InvalidUrl(String),

    #[error("Content fetch failed: {0}")]
    Failed(String),

    #[error("Content too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
}

/// Content Fetcher Port
#[async_trait]
pub trait ContentFetcherPort: Send + Sync {
    /// 拉取 UTF-8 文本
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}
