//! Truyen - 连载小说发布与阅读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说、章节与值对象
//! - Comment Context: 评论
//! - 章节分割器、slug 生成
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, ContentFetcher, ObjectStorage, ViewCountQueue）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: HTTP 文本拉取、文件对象存储
//! - Worker: 阅读计数后台任务

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::{load_config, AppConfig};
