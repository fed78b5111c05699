//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod bookmark_commands;
mod chapter_commands;
mod comment_commands;
mod novel_commands;
mod upload_commands;

pub mod handlers;

pub use bookmark_commands::*;
pub use chapter_commands::*;
pub use comment_commands::*;
pub use novel_commands::*;
pub use upload_commands::*;
