//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Novel Context: 小说与章节
//! - Comment Context: 评论
//!
//! 以及共享的章节分割器和 slug 生成

pub mod comment;
pub mod novel;

mod chapter_segmenter;
mod slug;

pub use chapter_segmenter::{
    duplicate_numbers, ChapterSegmenter, SegmentedChapter, SegmenterConfig, DEFAULT_MARKERS,
};
pub use slug::{slug_candidate, slugify, MAX_SLUG_LEN};

