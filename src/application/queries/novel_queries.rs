//! Novel Queries

use uuid::Uuid;

use crate::application::ports::{NovelFilter, PageRequest};

/// 小说定位方式
#[derive(Debug, Clone)]
pub enum NovelLookup {
    Id(Uuid),
    Slug(String),
}

/// 获取小说详情查询
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub lookup: NovelLookup,
}

/// 分页列出小说查询
#[derive(Debug, Clone, Default)]
pub struct ListNovels {
    pub filter: NovelFilter,
    pub page: PageRequest,
}
