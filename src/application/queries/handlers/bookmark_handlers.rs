//! Bookmark Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookmarkRepositoryPort, BookmarkView, Page};
use crate::application::queries::ListBookmarks;

/// ListBookmarks Handler
pub struct ListBookmarksHandler {
    bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
}

impl ListBookmarksHandler {
    pub fn new(bookmark_repo: Arc<dyn BookmarkRepositoryPort>) -> Self {
        Self { bookmark_repo }
    }

    pub async fn handle(
        &self,
        query: ListBookmarks,
    ) -> Result<Page<BookmarkView>, ApplicationError> {
        Ok(self
            .bookmark_repo
            .find_page_by_user(query.user_id, &query.page)
            .await?)
    }
}
