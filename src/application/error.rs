//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{FetchError, ObjectStorageError, RepositoryError};
use crate::domain::comment::CommentError;
use crate::domain::novel::NovelError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 未认证
    #[error("Authentication required")]
    Unauthorized,

    /// 无权操作他人资源
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 唯一约束冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 上游超时（拉取文本或对象存储）
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// 拉取外部文本失败
    #[error("Content fetch failed: {0}")]
    ContentFetchFailed(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建无权限错误
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound {
                resource_type: "Entity",
                id: what,
            },
            RepositoryError::Duplicate(what) => Self::Conflict(what),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<FetchError> for ApplicationError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => Self::Timeout("Content fetch"),
            FetchError::InvalidUrl(_) | FetchError::TooLarge { .. } => {
                Self::ValidationError(err.to_string())
            }
            FetchError::Failed(msg) => Self::ContentFetchFailed(msg),
        }
    }
}

impl From<ObjectStorageError> for ApplicationError {
    fn from(err: ObjectStorageError) -> Self {
        match err {
            ObjectStorageError::InvalidKey(_) => Self::ValidationError(err.to_string()),
            other => Self::StorageError(other.to_string()),
        }
    }
}

impl From<NovelError> for ApplicationError {
    fn from(err: NovelError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<CommentError> for ApplicationError {
    fn from(err: CommentError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
