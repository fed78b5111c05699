//! Comment Queries

use uuid::Uuid;

use crate::application::ports::PageRequest;

/// 分页列出评论查询
#[derive(Debug, Clone)]
pub struct ListComments {
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub page: PageRequest,
}
