//! Novel Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateNovel, DeleteNovel, UpdateNovel};
use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRecord, NovelRepositoryPort};
use crate::domain::novel::{Author, Description, Genres, NovelStatus, Title};
use crate::domain::{slug_candidate, slugify};

/// 生成 slug 时的最大尝试次数，超过后追加随机后缀
const MAX_SLUG_ATTEMPTS: u32 = 50;

/// 加载小说并校验操作者为上传者
pub(crate) async fn load_owned_novel(
    novel_repo: &dyn NovelRepositoryPort,
    novel_id: Uuid,
    actor_id: Uuid,
) -> Result<NovelRecord, ApplicationError> {
    let novel = novel_repo
        .find_by_id(novel_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

    if novel.uploader_id != actor_id {
        return Err(ApplicationError::forbidden(format!(
            "novel {} belongs to another user",
            novel_id
        )));
    }

    Ok(novel)
}

fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

// ============================================================================
// CreateNovel
// ============================================================================

/// CreateNovel Handler
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<NovelRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let author = Author::new(command.author)?;
        let description = Description::new(command.description.unwrap_or_default())?;
        let genres = Genres::new(command.genres)?;
        let status = match command.status.as_deref() {
            Some(s) => NovelStatus::parse(s)?,
            None => NovelStatus::default(),
        };

        let slug = self.unique_slug(title.as_str()).await?;
        let now = Utc::now();

        let novel = NovelRecord {
            id: Uuid::new_v4(),
            slug,
            title: title.into_inner(),
            author: author.into_inner(),
            description: description.into_inner(),
            cover_image_url: normalize_url(command.cover_image_url),
            genres: genres.into_inner(),
            status,
            chapter_count: 0,
            uploader_id: command.uploader_id,
            created_at: now,
            updated_at: now,
        };

        // slug 并发冲突由唯一约束兜底，返回 Conflict
        self.novel_repo.save(&novel).await?;

        tracing::info!(
            novel_id = %novel.id,
            slug = %novel.slug,
            uploader_id = %novel.uploader_id,
            "Novel created"
        );

        Ok(novel)
    }

    async fn unique_slug(&self, title: &str) -> Result<String, ApplicationError> {
        let base = slugify(title);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug_candidate(&base, attempt);
            if !self.novel_repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}-{}", base, &suffix[..8]))
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler
pub struct UpdateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<NovelRecord, ApplicationError> {
        let mut novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        if let Some(title) = command.title {
            novel.title = Title::new(title)?.into_inner();
        }
        if let Some(author) = command.author {
            novel.author = Author::new(author)?.into_inner();
        }
        if let Some(description) = command.description {
            novel.description = Description::new(description)?.into_inner();
        }
        if let Some(genres) = command.genres {
            novel.genres = Genres::new(genres)?.into_inner();
        }
        if let Some(status) = command.status {
            novel.status = NovelStatus::parse(&status)?;
        }
        if command.cover_image_url.is_some() {
            novel.cover_image_url = normalize_url(command.cover_image_url);
        }
        novel.updated_at = Utc::now();

        self.novel_repo.update(&novel).await?;

        tracing::info!(novel_id = %novel.id, "Novel updated");

        Ok(novel)
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl DeleteNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        let novel =
            load_owned_novel(self.novel_repo.as_ref(), command.novel_id, command.actor_id).await?;

        self.novel_repo.delete(novel.id).await?;

        tracing::info!(
            novel_id = %novel.id,
            title = %novel.title,
            "Novel deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    fn create_command(uploader_id: Uuid, title: &str) -> CreateNovel {
        CreateNovel {
            uploader_id,
            title: title.to_string(),
            author: "Thiên Tằm Thổ Đậu".to_string(),
            description: None,
            cover_image_url: Some("  ".to_string()),
            genres: vec!["Huyền Huyễn".to_string()],
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_generates_unique_slugs() {
        let fx = Fixture::new().await;
        let handler = CreateNovelHandler::new(fx.novel_repo.clone());
        let uploader = Uuid::new_v4();

        let first = handler.handle(create_command(uploader, "Đấu Phá")).await.unwrap();
        let second = handler.handle(create_command(uploader, "Đấu  phá!")).await.unwrap();

        assert_eq!(first.slug, "dau-pha");
        assert_eq!(second.slug, "dau-pha-2");
        assert_eq!(first.status, NovelStatus::Ongoing);
        assert_eq!(first.chapter_count, 0);
        assert!(first.cover_image_url.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let fx = Fixture::new().await;
        let handler = CreateNovelHandler::new(fx.novel_repo.clone());

        let mut command = create_command(Uuid::new_v4(), "Ok");
        command.genres.clear();
        assert!(matches!(
            handler.handle(command).await,
            Err(ApplicationError::ValidationError(_))
        ));

        let mut command = create_command(Uuid::new_v4(), "Ok");
        command.status = Some("dropped".to_string());
        assert!(matches!(
            handler.handle(command).await,
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_requires_owner_and_keeps_slug() {
        let fx = Fixture::new().await;
        let owner = Uuid::new_v4();
        let novel = fx.create_novel(owner).await;
        let handler = UpdateNovelHandler::new(fx.novel_repo.clone());

        let stranger = UpdateNovel {
            actor_id: Uuid::new_v4(),
            novel_id: novel.id,
            title: Some("Hijack".to_string()),
            author: None,
            description: None,
            cover_image_url: None,
            genres: None,
            status: None,
        };
        assert!(matches!(
            handler.handle(stranger).await,
            Err(ApplicationError::Forbidden(_))
        ));

        let updated = handler
            .handle(UpdateNovel {
                actor_id: owner,
                novel_id: novel.id,
                title: Some("Tên mới".to_string()),
                author: None,
                description: None,
                cover_image_url: None,
                genres: None,
                status: Some("completed".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Tên mới");
        assert_eq!(updated.slug, novel.slug);
        assert_eq!(updated.status, NovelStatus::Completed);

        let stored = fx.novel_repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Tên mới");
    }

    #[tokio::test]
    async fn test_delete_missing_and_foreign_novel() {
        let fx = Fixture::new().await;
        let handler = DeleteNovelHandler::new(fx.novel_repo.clone());

        let missing = handler
            .handle(DeleteNovel {
                actor_id: Uuid::new_v4(),
                novel_id: Uuid::new_v4(),
            })
            .await;
        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));

        let owner = Uuid::new_v4();
        let novel = fx.create_novel(owner).await;
        handler
            .handle(DeleteNovel {
                actor_id: owner,
                novel_id: novel.id,
            })
            .await
            .unwrap();
        assert!(fx.novel_repo.find_by_id(novel.id).await.unwrap().is_none());
    }
}
