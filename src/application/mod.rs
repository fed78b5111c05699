//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ContentFetcher、ObjectStorage、ViewCountQueue）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Novel commands
    CreateNovel,
    DeleteNovel,
    UpdateNovel,
    // Chapter commands
    ContentSource,
    DeleteChapter,
    ProcessChapterContent,
    UpdateChapter,
    UploadChapter,
    // Comment commands
    CreateComment,
    DeleteComment,
    ToggleCommentLike,
    // Bookmark commands
    ToggleBookmark,
    // Upload commands
    UploadFile,
    UploadKind,
    // Handlers
    handlers::{
        CreateCommentHandler, CreateNovelHandler, DeleteChapterHandler, DeleteCommentHandler,
        DeleteNovelHandler, ProcessChapterContentHandler, ProcessChapterResponse,
        ProcessedChapter, ToggleBookmarkHandler, ToggleCommentLikeHandler, UpdateChapterHandler,
        UpdateNovelHandler, UploadChapterHandler, UploadChapterResponse, UploadFileHandler,
        UploadFileResponse, UploadLimits,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Repositories
    BookmarkRecord,
    BookmarkRepositoryPort,
    BookmarkView,
    ChapterRecord,
    ChapterRepositoryPort,
    ChapterSummary,
    CommentRecord,
    CommentRepositoryPort,
    LikeToggle,
    NovelFilter,
    NovelRecord,
    NovelRepositoryPort,
    NovelStatus,
    Page,
    PageRequest,
    RepositoryError,
    // Content fetcher
    ContentFetcherPort,
    FetchError,
    // Object storage
    ObjectStorageError,
    ObjectStoragePort,
    StoredObject,
    // View count
    ViewCountQueuePort,
};

pub use queries::{
    // Novel queries
    GetNovel,
    ListNovels,
    NovelLookup,
    // Chapter queries
    ListChapters,
    ReadChapter,
    // Comment queries
    ListComments,
    // Bookmark queries
    ListBookmarks,
    // Handlers
    handlers::{
        GetNovelHandler, ListBookmarksHandler, ListChaptersHandler, ListCommentsHandler,
        ListNovelsHandler, ReadChapterHandler,
    },
};
