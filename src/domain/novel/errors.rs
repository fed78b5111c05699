//! Novel Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovelError {
    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid author: {0}")]
    InvalidAuthor(String),

    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    #[error("Invalid genres: {0}")]
    InvalidGenres(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid chapter number: {0}")]
    InvalidChapterNumber(String),

    #[error("Segmentation error: {0}")]
    SegmentationError(String),
}
