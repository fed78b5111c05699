//! Bookmark Queries

use uuid::Uuid;

use crate::application::ports::PageRequest;

/// 分页列出用户书签查询
#[derive(Debug, Clone)]
pub struct ListBookmarks {
    pub user_id: Uuid,
    pub page: PageRequest,
}
