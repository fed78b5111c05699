//! Novel Commands

use uuid::Uuid;

/// 创建小说命令
#[derive(Debug, Clone)]
pub struct CreateNovel {
    pub uploader_id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
}

/// 更新小说命令（仅上传者），None 字段保持不变
#[derive(Debug, Clone)]
pub struct UpdateNovel {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub status: Option<String>,
}

/// 删除小说命令（仅上传者）
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
}
