//! Novel Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelFilter, NovelRecord, NovelRepositoryPort, Page};
use crate::application::queries::{GetNovel, ListNovels, NovelLookup};

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GetNovel Handler
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelRecord, ApplicationError> {
        match query.lookup {
            NovelLookup::Id(id) => self
                .novel_repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Novel", id)),
            NovelLookup::Slug(slug) => self
                .novel_repo
                .find_by_slug(slug.trim())
                .await?
                .ok_or_else(|| ApplicationError::not_found("Novel", slug)),
        }
    }
}

/// ListNovels Handler
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: ListNovels) -> Result<Page<NovelRecord>, ApplicationError> {
        let filter = NovelFilter {
            genre: non_blank(query.filter.genre),
            status: query.filter.status,
            uploader_id: query.filter.uploader_id,
            search: non_blank(query.filter.search),
        };

        let page = self.novel_repo.find_page(&filter, &query.page).await?;

        tracing::debug!(
            total = page.total,
            page = page.page,
            returned = page.items.len(),
            "Novels listed"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{NovelStatus, PageRequest};
    use crate::test_support::Fixture;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_get_by_id_and_slug() {
        let fx = Fixture::new().await;
        let novel = fx.create_novel(Uuid::new_v4()).await;
        let handler = GetNovelHandler::new(fx.novel_repo.clone());

        let by_id = handler
            .handle(GetNovel { lookup: NovelLookup::Id(novel.id) })
            .await
            .unwrap();
        let by_slug = handler
            .handle(GetNovel { lookup: NovelLookup::Slug(novel.slug.clone()) })
            .await
            .unwrap();
        assert_eq!(by_id.id, novel.id);
        assert_eq!(by_slug.id, novel.id);

        let missing = handler
            .handle(GetNovel { lookup: NovelLookup::Slug("khong-co".to_string()) })
            .await;
        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_ignores_blank_filters() {
        let fx = Fixture::new().await;
        let uploader = Uuid::new_v4();
        for _ in 0..3 {
            fx.create_novel(uploader).await;
        }
        let handler = ListNovelsHandler::new(fx.novel_repo.clone());

        let page = handler
            .handle(ListNovels {
                filter: NovelFilter {
                    genre: Some("  ".to_string()),
                    status: Some(NovelStatus::Ongoing),
                    uploader_id: Some(uploader),
                    search: Some(String::new()),
                },
                page: PageRequest::new(Some(1), Some(2)),
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 2);
    }
}
