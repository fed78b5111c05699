//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub use crate::domain::novel::NovelStatus;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Pagination
// ============================================================================

/// 分页请求
///
/// page 从 1 开始，page_size 限制在 1..=MAX_PAGE_SIZE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 分页结果
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.page_size.max(1) as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub genres: Vec<String>,
    pub status: NovelStatus,
    /// 章节数缓存，每次增删章节时在同一事务内按行数重算
    pub chapter_count: u32,
    pub uploader_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 小说列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct NovelFilter {
    pub genre: Option<String>,
    pub status: Option<NovelStatus>,
    pub uploader_id: Option<Uuid>,
    /// 标题子串
    pub search: Option<String>,
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 新建小说（slug 冲突返回 Duplicate）
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 更新元数据（不含 chapter_count 和 slug）
    async fn update(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<NovelRecord>, RepositoryError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepositoryError>;

    /// 分页查询，按 updated_at 倒序
    async fn find_page(
        &self,
        filter: &NovelFilter,
        page: &PageRequest,
    ) -> Result<Page<NovelRecord>, RepositoryError>;

    /// 删除小说及其章节、评论、书签
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    /// 正文（分割生成的章节）
    pub content: Option<String>,
    /// 外部正文地址（单章上传）
    pub content_url: Option<String>,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节摘要（列表用，不含正文）
#[derive(Debug, Clone)]
pub struct ChapterSummary {
    pub id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 在一个事务内插入全部章节并重算小说的 chapter_count
    ///
    /// 任一章节号冲突则整体回滚并返回 Duplicate
    /// 返回新的 chapter_count
    async fn insert_batch(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<u32, RepositoryError>;

    async fn find_by_number(
        &self,
        novel_id: Uuid,
        chapter_number: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 分页查询，按章节号升序
    async fn find_page(
        &self,
        novel_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<ChapterSummary>, RepositoryError>;

    async fn update_title(&self, chapter_id: Uuid, title: &str) -> Result<(), RepositoryError>;

    /// 删除章节并重算 chapter_count，返回新的 chapter_count
    async fn delete(&self, novel_id: Uuid, chapter_number: u32) -> Result<u32, RepositoryError>;

    async fn increment_view_count(&self, chapter_id: Uuid) -> Result<(), RepositoryError>;

    async fn count_by_novel(&self, novel_id: Uuid) -> Result<u32, RepositoryError>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// 评论实体（用于持久化）
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

/// 点赞切换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: u64,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    async fn save(&self, comment: &CommentRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError>;

    /// 分页查询，按创建时间倒序；chapter_number 为 None 时返回整本小说的评论
    async fn find_page(
        &self,
        novel_id: Uuid,
        chapter_number: Option<u32>,
        page: &PageRequest,
    ) -> Result<Page<CommentRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 已点赞则取消，否则点赞；like_count 在同一事务内按行数重算
    async fn toggle_like(&self, comment_id: Uuid, user_id: Uuid)
        -> Result<LikeToggle, RepositoryError>;
}

// ============================================================================
// Bookmark Repository
// ============================================================================

/// 书签实体（用于持久化）
#[derive(Debug, Clone)]
pub struct BookmarkRecord {
    pub user_id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// 书签列表项（带小说标题）
#[derive(Debug, Clone)]
pub struct BookmarkView {
    pub novel_id: Uuid,
    pub novel_title: String,
    pub novel_slug: String,
    pub chapter_number: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Bookmark Repository Port
#[async_trait]
pub trait BookmarkRepositoryPort: Send + Sync {
    /// 已存在则删除，否则创建；返回切换后是否处于收藏状态
    async fn toggle(&self, bookmark: &BookmarkRecord) -> Result<bool, RepositoryError>;

    /// 分页查询用户书签，按创建时间倒序
    async fn find_page_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<BookmarkView>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamping() {
        let page = PageRequest::new(None, None);
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_size(), PageRequest::DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);

        let page = PageRequest::new(Some(0), Some(0));
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_size(), 1);

        let page = PageRequest::new(Some(3), Some(1000));
        assert_eq!(page.page_size(), PageRequest::MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 200);
    }

    #[test]
    fn test_total_pages() {
        let request = PageRequest::new(Some(1), Some(20));
        assert_eq!(Page::<()>::new(vec![], 0, &request).total_pages(), 0);
        assert_eq!(Page::<()>::new(vec![], 20, &request).total_pages(), 1);
        assert_eq!(Page::<()>::new(vec![], 21, &request).total_pages(), 2);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let request = PageRequest::new(Some(2), Some(5));
        let page = Page::new(vec![1, 2], 7, &request).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages(), 2);
    }
}
