//! Bookmark Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::ToggleBookmark;
use crate::application::error::ApplicationError;
use crate::application::ports::{BookmarkRecord, BookmarkRepositoryPort, NovelRepositoryPort};
use crate::domain::novel::ChapterNumber;

/// ToggleBookmark Handler，返回切换后是否处于收藏状态
pub struct ToggleBookmarkHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
}

impl ToggleBookmarkHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            bookmark_repo,
        }
    }

    pub async fn handle(&self, command: ToggleBookmark) -> Result<bool, ApplicationError> {
        if let Some(number) = command.chapter_number {
            ChapterNumber::new(number)?;
        }

        self.novel_repo
            .find_by_id(command.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        let bookmarked = self
            .bookmark_repo
            .toggle(&BookmarkRecord {
                user_id: command.user_id,
                novel_id: command.novel_id,
                chapter_number: command.chapter_number,
                created_at: Utc::now(),
            })
            .await?;

        tracing::debug!(
            user_id = %command.user_id,
            novel_id = %command.novel_id,
            bookmarked = bookmarked,
            "Bookmark toggled"
        );

        Ok(bookmarked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PageRequest;
    use crate::test_support::Fixture;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_toggle_bookmark() {
        let fx = Fixture::new().await;
        let novel = fx.create_novel(Uuid::new_v4()).await;
        let handler = ToggleBookmarkHandler::new(fx.novel_repo.clone(), fx.bookmark_repo.clone());
        let user = Uuid::new_v4();
        let command = ToggleBookmark {
            user_id: user,
            novel_id: novel.id,
            chapter_number: Some(3),
        };

        assert!(handler.handle(command.clone()).await.unwrap());
        let page = fx
            .bookmark_repo
            .find_page_by_user(user, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].chapter_number, Some(3));
        assert_eq!(page.items[0].novel_title, novel.title);

        assert!(!handler.handle(command).await.unwrap());
        let page = fx
            .bookmark_repo
            .find_page_by_user(user, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_toggle_bookmark_validation() {
        let fx = Fixture::new().await;
        let handler = ToggleBookmarkHandler::new(fx.novel_repo.clone(), fx.bookmark_repo.clone());

        let missing = handler
            .handle(ToggleBookmark {
                user_id: Uuid::new_v4(),
                novel_id: Uuid::new_v4(),
                chapter_number: None,
            })
            .await;
        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));

        let novel = fx.create_novel(Uuid::new_v4()).await;
        let zero = handler
            .handle(ToggleBookmark {
                user_id: Uuid::new_v4(),
                novel_id: novel.id,
                chapter_number: Some(0),
            })
            .await;
        assert!(matches!(zero, Err(ApplicationError::ValidationError(_))));
    }
}
