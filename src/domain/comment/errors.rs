//! Comment Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Invalid comment: {0}")]
    InvalidContent(String),
}
