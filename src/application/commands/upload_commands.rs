//! Upload Commands

/// 上传文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// 章节 TXT
    ChapterText,
    /// 封面图片
    CoverImage,
}

impl UploadKind {
    /// 对象 key 前缀
    pub fn key_prefix(&self) -> &'static str {
        match self {
            UploadKind::ChapterText => "chapters",
            UploadKind::CoverImage => "covers",
        }
    }
}

/// 上传文件命令
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub kind: UploadKind,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}
