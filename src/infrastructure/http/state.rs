//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    CreateCommentHandler, CreateNovelHandler, DeleteChapterHandler, DeleteCommentHandler,
    DeleteNovelHandler, ProcessChapterContentHandler, ToggleBookmarkHandler,
    ToggleCommentLikeHandler, UpdateChapterHandler, UpdateNovelHandler, UploadChapterHandler,
    UploadFileHandler, UploadLimits,
    // Query handlers
    GetNovelHandler, ListBookmarksHandler, ListChaptersHandler, ListCommentsHandler,
    ListNovelsHandler, ReadChapterHandler,
    // Ports
    BookmarkRepositoryPort, ChapterRepositoryPort, CommentRepositoryPort, ContentFetcherPort,
    NovelRepositoryPort, ObjectStoragePort, ViewCountQueuePort,
};
use crate::application::commands::handlers::DEFAULT_FETCH_TIMEOUT;
use crate::domain::ChapterSegmenter;

/// 应用所依赖的端口
#[derive(Clone)]
pub struct AppPorts {
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub comment_repo: Arc<dyn CommentRepositoryPort>,
    pub bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
    pub fetcher: Arc<dyn ContentFetcherPort>,
    pub storage: Arc<dyn ObjectStoragePort>,
    pub view_queue: Arc<dyn ViewCountQueuePort>,
}

/// 运行参数
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub segmenter: ChapterSegmenter,
    pub fetch_timeout: Duration,
    pub upload_limits: UploadLimits,
}

impl AppSettings {
    /// 拉取超时与上传限制取默认值
    pub fn with_segmenter(segmenter: ChapterSegmenter) -> Self {
        Self {
            segmenter,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            upload_limits: UploadLimits::default(),
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub upload_chapter_handler: UploadChapterHandler,
    pub process_chapter_handler: ProcessChapterContentHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub upload_file_handler: UploadFileHandler,
    pub create_comment_handler: CreateCommentHandler,
    pub delete_comment_handler: DeleteCommentHandler,
    pub toggle_comment_like_handler: ToggleCommentLikeHandler,
    pub toggle_bookmark_handler: ToggleBookmarkHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub read_chapter_handler: ReadChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub list_comments_handler: ListCommentsHandler,
    pub list_bookmarks_handler: ListBookmarksHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(ports: AppPorts, settings: AppSettings) -> Self {
        let AppPorts {
            novel_repo,
            chapter_repo,
            comment_repo,
            bookmark_repo,
            fetcher,
            storage,
            view_queue,
        } = ports;

        Self {
            // Command handlers
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(novel_repo.clone()),
            upload_chapter_handler: UploadChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            process_chapter_handler: ProcessChapterContentHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                fetcher,
                settings.segmenter,
                settings.fetch_timeout,
            ),
            update_chapter_handler: UpdateChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            delete_chapter_handler: DeleteChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            upload_file_handler: UploadFileHandler::new(storage, settings.upload_limits),
            create_comment_handler: CreateCommentHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
                comment_repo.clone(),
            ),
            delete_comment_handler: DeleteCommentHandler::new(comment_repo.clone()),
            toggle_comment_like_handler: ToggleCommentLikeHandler::new(comment_repo.clone()),
            toggle_bookmark_handler: ToggleBookmarkHandler::new(
                novel_repo.clone(),
                bookmark_repo.clone(),
            ),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(novel_repo.clone()),
            list_novels_handler: ListNovelsHandler::new(novel_repo.clone()),
            read_chapter_handler: ReadChapterHandler::new(chapter_repo.clone(), view_queue),
            list_chapters_handler: ListChaptersHandler::new(novel_repo.clone(), chapter_repo),
            list_comments_handler: ListCommentsHandler::new(novel_repo, comment_repo),
            list_bookmarks_handler: ListBookmarksHandler::new(bookmark_repo),
        }
    }
}
