//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 对象存储与上传配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 外部文本拉取配置
    #[serde(default)]
    pub fetch: FetchConfig,

    /// 后台任务配置
    #[serde(default)]
    pub worker: WorkerConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（用于生成上传文件地址）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = if self.host == "0.0.0.0" {
                    "localhost"
                } else {
                    &self.host
                };
                format!("http://{}:{}", host, self.port)
            }
        }
    }

    /// 上传对象的公开前缀
    pub fn files_base_url(&self) -> String {
        format!("{}/files", self.public_base_url())
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/truyen.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传对象存储目录
    #[serde(default = "default_objects_dir")]
    pub objects_dir: PathBuf,

    /// 单次上传超时（秒）
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    /// 章节文本最大大小（字节），默认 1MB
    #[serde(default = "default_max_chapter_text_bytes")]
    pub max_chapter_text_bytes: usize,

    /// 封面图片最大大小（字节），默认 5MB
    #[serde(default = "default_max_cover_image_bytes")]
    pub max_cover_image_bytes: usize,
}

fn default_objects_dir() -> PathBuf {
    PathBuf::from("data/objects")
}

fn default_upload_timeout() -> u64 {
    30
}

fn default_max_chapter_text_bytes() -> usize {
    1024 * 1024
}

fn default_max_cover_image_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            objects_dir: default_objects_dir(),
            upload_timeout_secs: default_upload_timeout(),
            max_chapter_text_bytes: default_max_chapter_text_bytes(),
            max_cover_image_bytes: default_max_cover_image_bytes(),
        }
    }
}

impl StorageConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// 请求体上限：最大上传文件再留 1MB 给 multipart 开销
    pub fn body_limit_bytes(&self) -> usize {
        self.max_chapter_text_bytes.max(self.max_cover_image_bytes) + 1024 * 1024
    }
}

/// 外部文本拉取配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// 响应体最大大小（字节）
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: u64,
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_max_content_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 后台任务配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// 阅读计数队列容量
    #[serde(default = "default_view_count_queue_capacity")]
    pub view_count_queue_capacity: usize,
}

fn default_view_count_queue_capacity() -> usize {
    1024
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            view_count_queue_capacity: default_view_count_queue_capacity(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
