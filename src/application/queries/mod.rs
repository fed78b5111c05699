//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod bookmark_queries;
mod chapter_queries;
mod comment_queries;
mod novel_queries;

pub mod handlers;

pub use bookmark_queries::*;
pub use chapter_queries::*;
pub use comment_queries::*;
pub use novel_queries::*;
