//! Chapter Command Handlers
//!
//! 单章上传、文本分割处理、章节元数据编辑与删除
//! 所有增删章节的写操作都在一个事务内重算小说的 chapter_count

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::novel_handlers::load_owned_novel;
use crate::application::commands::{
    ContentSource, DeleteChapter, ProcessChapterContent, UpdateChapter, UploadChapter,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, ContentFetcherPort, NovelRepositoryPort,
};
use crate::domain::novel::{ChapterNumber, ChapterTitle};
use crate::domain::{duplicate_numbers, ChapterSegmenter};

/// 默认拉取超时
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn validate_content_url(url: &str) -> Result<String, ApplicationError> {
    let url = url.trim();
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ApplicationError::validation(format!("invalid content_url: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApplicationError::validation(
            "content_url must be an http(s) URL",
        ));
    }
    Ok(url.to_string())
}

// ============================================================================
// UploadChapter
// ============================================================================

/// 单章上传响应
#[derive(Debug, Clone)]
pub struct UploadChapterResponse {
    pub chapter: ChapterRecord,
    pub chapter_count: u32,
}

/// UploadChapter Handler
pub struct UploadChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UploadChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        command: UploadChapter,
    ) -> Result<UploadChapterResponse, ApplicationError> {
        let novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        let number = ChapterNumber::new(command.chapter_number)?;
        let title = ChapterTitle::new(command.title, number)?;
        let content_url = validate_content_url(&command.content_url)?;
        let now = Utc::now();

        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id: novel.id,
            chapter_number: number.get(),
            title: title.into_inner(),
            content: None,
            content_url: Some(content_url),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };

        let chapter_count = self
            .chapter_repo
            .insert_batch(novel.id, std::slice::from_ref(&chapter))
            .await?;

        tracing::info!(
            novel_id = %novel.id,
            chapter_number = chapter.chapter_number,
            chapter_count = chapter_count,
            "Chapter uploaded"
        );

        Ok(UploadChapterResponse {
            chapter,
            chapter_count,
        })
    }
}

// ============================================================================
// ProcessChapterContent
// ============================================================================

/// 分割出的章节概要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedChapter {
    pub chapter_number: u32,
    pub title: String,
}

/// 分割处理响应
#[derive(Debug, Clone)]
pub struct ProcessChapterResponse {
    pub novel_id: Uuid,
    pub created: usize,
    pub chapter_count: u32,
    pub chapters: Vec<ProcessedChapter>,
}

/// ProcessChapterContent Handler
///
/// 拉取 → 分割 → 单事务批量写入并重算 chapter_count
pub struct ProcessChapterContentHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    fetcher: Arc<dyn ContentFetcherPort>,
    segmenter: ChapterSegmenter,
    fetch_timeout: Duration,
}

impl ProcessChapterContentHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        fetcher: Arc<dyn ContentFetcherPort>,
        segmenter: ChapterSegmenter,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            fetcher,
            segmenter,
            fetch_timeout,
        }
    }

    async fn load_text(&self, source: ContentSource) -> Result<String, ApplicationError> {
        let text = match source {
            ContentSource::Inline(text) => text,
            ContentSource::Url(url) => {
                let url = validate_content_url(&url)?;
                tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch_text(&url))
                    .await
                    .map_err(|_| ApplicationError::Timeout("Content fetch"))??
            }
        };

        // 行首 BOM 会让第一个章节标记失配
        Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
    }

    pub async fn handle(
        &self,
        command: ProcessChapterContent,
    ) -> Result<ProcessChapterResponse, ApplicationError> {
        let novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        let text = self.load_text(command.source).await?;
        if text.trim().is_empty() {
            return Err(ApplicationError::validation("content is empty"));
        }

        let segments = self.segmenter.segment(&text);

        // 写库前拒绝重复章节号，避免事务中途失败
        let duplicates = duplicate_numbers(&segments);
        if !duplicates.is_empty() {
            return Err(ApplicationError::validation(format!(
                "duplicate chapter numbers in content: {:?}",
                duplicates
            )));
        }

        let now = Utc::now();
        let records: Vec<ChapterRecord> = segments
            .into_iter()
            .map(|segment| ChapterRecord {
                id: Uuid::new_v4(),
                novel_id: novel.id,
                chapter_number: segment.number.get(),
                title: segment.title,
                content: Some(segment.content),
                content_url: None,
                view_count: 0,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let chapter_count = self.chapter_repo.insert_batch(novel.id, &records).await?;

        tracing::info!(
            novel_id = %novel.id,
            created = records.len(),
            chapter_count = chapter_count,
            "Chapter content processed"
        );

        Ok(ProcessChapterResponse {
            novel_id: novel.id,
            created: records.len(),
            chapter_count,
            chapters: records
                .into_iter()
                .map(|r| ProcessedChapter {
                    chapter_number: r.chapter_number,
                    title: r.title,
                })
                .collect(),
        })
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        let number = ChapterNumber::new(command.chapter_number)?;
        let mut chapter = self
            .chapter_repo
            .find_by_number(novel.id, number.get())
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found("Chapter", format!("{}#{}", novel.id, number))
            })?;

        chapter.title = ChapterTitle::new(command.title, number)?.into_inner();
        chapter.updated_at = Utc::now();
        self.chapter_repo.update_title(chapter.id, &chapter.title).await?;

        tracing::info!(
            novel_id = %novel.id,
            chapter_number = chapter.chapter_number,
            "Chapter updated"
        );

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler，返回新的 chapter_count
pub struct DeleteChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<u32, ApplicationError> {
        let novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        if self
            .chapter_repo
            .find_by_number(novel.id, command.chapter_number)
            .await?
            .is_none()
        {
            return Err(ApplicationError::not_found(
                "Chapter",
                format!("{}#{}", novel.id, command.chapter_number),
            ));
        }

        let chapter_count = self
            .chapter_repo
            .delete(novel.id, command.chapter_number)
            .await?;

        tracing::info!(
            novel_id = %novel.id,
            chapter_number = command.chapter_number,
            chapter_count = chapter_count,
            "Chapter deleted"
        );

        Ok(chapter_count)
    }
}
