//! Comment Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateComment, DeleteComment, ToggleCommentLike};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRepositoryPort, CommentRecord, CommentRepositoryPort, LikeToggle, NovelRepositoryPort,
};
use crate::domain::comment::CommentContent;

/// 未提供显示名时使用
const DEFAULT_AUTHOR_NAME: &str = "Reader";

// ============================================================================
// CreateComment
// ============================================================================

/// CreateComment Handler
pub struct CreateCommentHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl CreateCommentHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
            comment_repo,
        }
    }

    pub async fn handle(&self, command: CreateComment) -> Result<CommentRecord, ApplicationError> {
        let content = CommentContent::new(command.content)?;

        self.novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        if let Some(number) = command.chapter_number {
            self.chapter_repo
                .find_by_number(command.novel_id, number)
                .await?
                .ok_or_else(|| {
                    ApplicationError::not_found("Chapter", format!("{}#{}", command.novel_id, number))
                })?;
        }

        let author_name = command
            .author_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());

        let comment = CommentRecord {
            id: Uuid::new_v4(),
            novel_id: command.novel_id,
            chapter_number: command.chapter_number,
            author_id: command.author_id,
            author_name,
            content: content.into_inner(),
            like_count: 0,
            created_at: Utc::now(),
        };

        self.comment_repo.save(&comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            novel_id = %comment.novel_id,
            chapter_number = ?comment.chapter_number,
            "Comment created"
        );

        Ok(comment)
    }
}

// ============================================================================
// DeleteComment
// ============================================================================

/// DeleteComment Handler
pub struct DeleteCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl DeleteCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: DeleteComment) -> Result<(), ApplicationError> {
        let comment = self
            .comment_repo
            .find_by_id(command.comment_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Comment", command.comment_id))?;

        if comment.author_id != command.actor_id {
            return Err(ApplicationError::forbidden(format!(
                "comment {} belongs to another user",
                comment.id
            )));
        }

        self.comment_repo.delete(comment.id).await?;

        tracing::info!(comment_id = %comment.id, "Comment deleted");

        Ok(())
    }
}

// ============================================================================
// ToggleCommentLike
// ============================================================================

/// ToggleCommentLike Handler
pub struct ToggleCommentLikeHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ToggleCommentLikeHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: ToggleCommentLike) -> Result<LikeToggle, ApplicationError> {
        self.comment_repo
            .find_by_id(command.comment_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Comment", command.comment_id))?;

        let result = self
            .comment_repo
            .toggle_like(command.comment_id, command.user_id)
            .await?;

        tracing::debug!(
            comment_id = %command.comment_id,
            user_id = %command.user_id,
            liked = result.liked,
            like_count = result.like_count,
            "Comment like toggled"
        );

        Ok(result)
    }
}
