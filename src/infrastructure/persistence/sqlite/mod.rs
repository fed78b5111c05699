//! SQLite Persistence - SQLite 数据库持久化实现

mod bookmark_repo;
mod chapter_repo;
mod comment_repo;
mod database;
mod novel_repo;

pub use bookmark_repo::*;
pub use chapter_repo::*;
pub use comment_repo::*;
pub use database::*;
pub use novel_repo::*;
