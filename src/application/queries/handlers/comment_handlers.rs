//! Comment Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CommentRecord, CommentRepositoryPort, NovelRepositoryPort, Page};
use crate::application::queries::ListComments;

/// ListComments Handler
///
/// `chapter_number` 为空时只列出小说级评论
pub struct ListCommentsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ListCommentsHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            comment_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListComments,
    ) -> Result<Page<CommentRecord>, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self
            .comment_repo
            .find_page(query.novel_id, query.chapter_number, &query.page)
            .await?)
    }
}
