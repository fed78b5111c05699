//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod bookmark_handlers;
mod chapter_handlers;
mod comment_handlers;
mod novel_handlers;

pub use bookmark_handlers::*;
pub use chapter_handlers::*;
pub use comment_handlers::*;
pub use novel_handlers::*;
