//! Comment Commands

use uuid::Uuid;

/// 发表评论命令
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub content: String,
}

/// 删除评论命令（仅作者）
#[derive(Debug, Clone)]
pub struct DeleteComment {
    pub actor_id: Uuid,
    pub comment_id: Uuid,
}

/// 点赞/取消点赞命令
#[derive(Debug, Clone)]
pub struct ToggleCommentLike {
    pub user_id: Uuid,
    pub comment_id: Uuid,
}
