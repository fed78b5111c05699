//! Bookmark Commands

use uuid::Uuid;

/// 收藏/取消收藏命令
#[derive(Debug, Clone)]
pub struct ToggleBookmark {
    pub user_id: Uuid,
    pub novel_id: Uuid,
    /// 阅读位置（仅在新建书签时记录）
    pub chapter_number: Option<u32>,
}
