//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod content_fetcher;
mod object_storage;
mod repositories;
mod view_counter;

pub use content_fetcher::{ContentFetcherPort, FetchError};
pub use object_storage::{ObjectStorageError, ObjectStoragePort, StoredObject};
pub use repositories::{
    BookmarkRecord, BookmarkRepositoryPort, BookmarkView, ChapterRecord, ChapterRepositoryPort,
    ChapterSummary, CommentRecord, CommentRepositoryPort, LikeToggle, NovelFilter, NovelRecord,
    NovelRepositoryPort, NovelStatus, Page, PageRequest, RepositoryError,
};
pub use view_counter::ViewCountQueuePort;
