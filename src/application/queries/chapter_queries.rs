//! Chapter Queries

use uuid::Uuid;

use crate::application::ports::PageRequest;

/// 阅读章节查询（附带一次阅读计数）
#[derive(Debug, Clone)]
pub struct ReadChapter {
    pub novel_id: Uuid,
    pub chapter_number: u32,
}

/// 分页列出章节查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: Uuid,
    pub page: PageRequest,
}
