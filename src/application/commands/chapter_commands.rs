//! Chapter Commands

use uuid::Uuid;

/// 单章上传命令：只保存外部正文地址，不拉取
#[derive(Debug, Clone)]
pub struct UploadChapter {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: Option<String>,
    pub content_url: String,
}

/// 待分割文本来源
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// 请求内直接携带
    Inline(String),
    /// 外部地址，需要拉取
    Url(String),
}

/// 文本分割处理命令：拉取 → 分割 → 批量写入
#[derive(Debug, Clone)]
pub struct ProcessChapterContent {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
    pub source: ContentSource,
}

/// 更新章节元数据命令
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: Option<String>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub actor_id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
}
