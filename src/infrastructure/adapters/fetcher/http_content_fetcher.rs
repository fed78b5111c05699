//! HTTP Content Fetcher - 拉取外部章节文本
//!
//! 实现 ContentFetcherPort trait，GET 指定 URL 并按 UTF-8 解码

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{ContentFetcherPort, FetchError};

/// HTTP 拉取客户端配置
#[derive(Debug, Clone)]
pub struct HttpContentFetcherConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 响应体上限（字节）
    pub max_content_bytes: u64,
}

impl Default for HttpContentFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_content_bytes: 10 * 1024 * 1024,
        }
    }
}

impl HttpContentFetcherConfig {
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_content_bytes(mut self, bytes: u64) -> Self {
        self.max_content_bytes = bytes;
        self
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Failed(format!("Cannot connect to content host: {}", err))
    } else {
        FetchError::Failed(err.to_string())
    }
}

/// HTTP 拉取客户端
pub struct HttpContentFetcher {
    client: Client,
    config: HttpContentFetcherConfig,
}

impl HttpContentFetcher {
    pub fn new(config: HttpContentFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Failed(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ContentFetcherPort for HttpContentFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        tracing::debug!(url = %parsed, "Fetching chapter content");

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Failed(format!("HTTP {}", status)));
        }

        let limit = self.config.max_content_bytes;
        if let Some(size) = response.content_length() {
            if size > limit {
                return Err(FetchError::TooLarge { size, limit });
            }
        }

        // 分块读取，未声明长度时同样受上限约束
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > limit {
                return Err(FetchError::TooLarge {
                    size: body.len() as u64,
                    limit,
                });
            }
        }

        let text = String::from_utf8(body)
            .map_err(|_| FetchError::Failed("content is not valid UTF-8".to_string()))?;
        let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);

        tracing::info!(url = %url, bytes = text.len(), "Chapter content fetched");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    async fn serve() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { "\u{feff}Chương 1\nNội dung" }))
            .route("/big", get(|| async { "x".repeat(64) }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    "late"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_config_builder() {
        let config = HttpContentFetcherConfig::default()
            .with_timeout(5)
            .with_max_content_bytes(1024);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_content_bytes, 1024);
    }

    #[tokio::test]
    async fn test_fetch_text_strips_bom() {
        let base = serve().await;
        let fetcher = HttpContentFetcher::new(HttpContentFetcherConfig::default()).unwrap();

        let text = fetcher.fetch_text(&format!("{}/ok", base)).await.unwrap();
        assert_eq!(text, "Chương 1\nNội dung");
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let base = serve().await;
        let fetcher = HttpContentFetcher::new(
            HttpContentFetcherConfig::default()
                .with_timeout(1)
                .with_max_content_bytes(16),
        )
        .unwrap();

        assert!(matches!(
            fetcher.fetch_text(&format!("{}/big", base)).await,
            Err(FetchError::TooLarge { limit: 16, .. })
        ));
        assert!(matches!(
            fetcher.fetch_text(&format!("{}/missing", base)).await,
            Err(FetchError::Failed(_))
        ));
        assert!(matches!(
            fetcher.fetch_text(&format!("{}/slow", base)).await,
            Err(FetchError::Timeout)
        ));
        assert!(matches!(
            fetcher.fetch_text("ftp://example.com/a.txt").await,
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
