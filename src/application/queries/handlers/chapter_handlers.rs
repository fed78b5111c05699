//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, ChapterSummary, NovelRepositoryPort, Page,
    ViewCountQueuePort,
};
use crate::application::queries::{ListChapters, ReadChapter};

/// ReadChapter Handler
///
/// 返回章节全文，并把一次阅读计数交给后台队列
pub struct ReadChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    view_queue: Arc<dyn ViewCountQueuePort>,
}

impl ReadChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        view_queue: Arc<dyn ViewCountQueuePort>,
    ) -> Self {
        Self {
            chapter_repo,
            view_queue,
        }
    }

    pub async fn handle(&self, query: ReadChapter) -> Result<ChapterRecord, ApplicationError> {
        let chapter = self
            .chapter_repo
            .find_by_number(query.novel_id, query.chapter_number)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(
                    "Chapter",
                    format!("{}#{}", query.novel_id, query.chapter_number),
                )
            })?;

        if !self.view_queue.enqueue(chapter.id) {
            tracing::warn!(
                chapter_id = %chapter.id,
                "View count queue full, dropping view"
            );
        }

        Ok(chapter)
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
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
        query: ListChapters,
    ) -> Result<Page<ChapterSummary>, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self.chapter_repo.find_page(query.novel_id, &query.page).await?)
    }
}
