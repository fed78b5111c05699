//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    BookmarkView, ChapterRecord, ChapterSummary, CommentRecord, NovelRecord, Page, PageRequest,
};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// 分页
// ============================================================================

/// 分页参数（请求体内嵌）
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

/// 分页响应
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T: Serialize> PageResponse<T> {
    pub fn from_page<R>(page: Page<R>, f: impl FnMut(R) -> T) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NovelView {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub genres: Vec<String>,
    pub status: String,
    pub chapter_count: u32,
    pub uploader_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NovelRecord> for NovelView {
    fn from(record: NovelRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            title: record.title,
            author: record.author,
            description: record.description,
            cover_image_url: record.cover_image_url,
            genres: record.genres,
            status: record.status.as_str().to_string(),
            chapter_count: record.chapter_count,
            uploader_id: record.uploader_id,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterView {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    pub content: Option<String>,
    pub content_url: Option<String>,
    pub view_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterView {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            chapter_number: record.chapter_number,
            title: record.title,
            content: record.content,
            content_url: record.content_url,
            view_count: record.view_count,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterSummaryView {
    pub id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    pub view_count: u64,
    pub created_at: String,
}

impl From<ChapterSummary> for ChapterSummaryView {
    fn from(summary: ChapterSummary) -> Self {
        Self {
            id: summary.id,
            chapter_number: summary.chapter_number,
            title: summary.title,
            view_count: summary.view_count,
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub like_count: u64,
    pub created_at: String,
}

impl From<CommentRecord> for CommentView {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            novel_id: record.novel_id,
            chapter_number: record.chapter_number,
            author_id: record.author_id,
            author_name: record.author_name,
            content: record.content,
            like_count: record.like_count,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkItemView {
    pub novel_id: Uuid,
    pub novel_title: String,
    pub novel_slug: String,
    pub chapter_number: Option<u32>,
    pub created_at: String,
}

impl From<BookmarkView> for BookmarkItemView {
    fn from(view: BookmarkView) -> Self {
        Self {
            novel_id: view.novel_id,
            novel_title: view.novel_title,
            novel_slug: view.novel_slug,
            chapter_number: view.chapter_number,
            created_at: view.created_at.to_rfc3339(),
        }
    }
}
