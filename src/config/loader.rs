//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "TRUYEN";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TRUYEN_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TRUYEN_SERVER__PORT=8080`
/// - `TRUYEN_SERVER__BASE_URL=https://truyen.example.com`
/// - `TRUYEN_DATABASE__PATH=/data/truyen.db`
/// - `TRUYEN_FETCH__TIMEOUT_SECS=10`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("database.path", "data/truyen.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.objects_dir", "data/objects")?
        .set_default("storage.upload_timeout_secs", 30)?
        .set_default("storage.max_chapter_text_bytes", 1024 * 1024)?
        .set_default("storage.max_cover_image_bytes", 5 * 1024 * 1024)?
        .set_default("fetch.timeout_secs", 30)?
        .set_default("fetch.max_content_bytes", 10 * 1024 * 1024)?
        .set_default("worker.view_count_queue_capacity", 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if let Some(base_url) = &config.server.base_url {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("Server base_url must be an http(s) URL"));
        }
    }

    if config.database.path.is_empty() {
        return Err(invalid("Database path cannot be empty"));
    }

    if config.database.max_connections == 0 {
        return Err(invalid("Database max_connections cannot be 0"));
    }

    if config.storage.objects_dir.as_os_str().is_empty() {
        return Err(invalid("Storage objects_dir cannot be empty"));
    }

    if config.storage.upload_timeout_secs == 0 {
        return Err(invalid("Storage upload_timeout_secs cannot be 0"));
    }

    if config.storage.max_chapter_text_bytes == 0 || config.storage.max_cover_image_bytes == 0 {
        return Err(invalid("Upload size limits cannot be 0"));
    }

    if config.fetch.timeout_secs == 0 {
        return Err(invalid("Fetch timeout_secs cannot be 0"));
    }

    if config.fetch.max_content_bytes == 0 {
        return Err(invalid("Fetch max_content_bytes cannot be 0"));
    }

    if config.worker.view_count_queue_capacity == 0 {
        return Err(invalid("Worker view_count_queue_capacity cannot be 0"));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Objects Directory: {:?}", config.storage.objects_dir);
    tracing::info!("Upload Timeout: {}s", config.storage.upload_timeout_secs);
    tracing::info!(
        "Upload Limits: text {} bytes, cover {} bytes",
        config.storage.max_chapter_text_bytes,
        config.storage.max_cover_image_bytes
    );
    tracing::info!("Fetch Timeout: {}s", config.fetch.timeout_secs);
    tracing::info!(
        "View Count Queue Capacity: {}",
        config.worker.view_count_queue_capacity
    );
    tracing::info!("Log Level: {} (json: {})", config.log.level, config.log.json);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_base_url() {
        let mut config = AppConfig::default();
        config.server.base_url = Some("truyen.example.com".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_limits() {
        let mut config = AppConfig::default();
        config.worker.view_count_queue_capacity = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.fetch.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[storage]\nmax_cover_image_bytes = 2048\n\n[log]\njson = true"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.max_cover_image_bytes, 2048);
        assert_eq!(config.storage.max_chapter_text_bytes, 1024 * 1024);
        assert!(config.log.json);
    }
}
