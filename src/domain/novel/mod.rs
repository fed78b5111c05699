//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 小说元数据校验（标题、作者、简介、类型、连载状态）
//! - 章节号与默认章节标题

mod errors;
mod value_objects;

pub use errors::NovelError;
pub use value_objects::{
    Author, ChapterNumber, ChapterTitle, Description, Genres, NovelStatus, Title,
};
