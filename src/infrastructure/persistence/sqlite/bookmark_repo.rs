//! SQLite Bookmark Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_time, parse_uuid, to_u32};
use super::DbPool;
use crate::application::ports::{
    BookmarkRecord, BookmarkRepositoryPort, BookmarkView, Page, PageRequest, RepositoryError,
};

/// SQLite Bookmark Repository
pub struct SqliteBookmarkRepository {
    pool: DbPool,
}

impl SqliteBookmarkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookmarkViewRow {
    novel_id: String,
    novel_title: String,
    novel_slug: String,
    chapter_number: Option<i64>,
    created_at: String,
}

impl TryFrom<BookmarkViewRow> for BookmarkView {
    type Error = RepositoryError;

    fn try_from(row: BookmarkViewRow) -> Result<Self, Self::Error> {
        Ok(BookmarkView {
            novel_id: parse_uuid(&row.novel_id)?,
            novel_title: row.novel_title,
            novel_slug: row.novel_slug,
            chapter_number: row.chapter_number.map(to_u32).transpose()?,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

#[async_trait]
impl BookmarkRepositoryPort for SqliteBookmarkRepository {
    async fn toggle(&self, bookmark: &BookmarkRecord) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let removed = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND novel_id = ?")
            .bind(bookmark.user_id.to_string())
            .bind(bookmark.novel_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO bookmarks (user_id, novel_id, chapter_number, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(bookmark.user_id.to_string())
            .bind(bookmark.novel_id.to_string())
            .bind(bookmark.chapter_number.map(i64::from))
            .bind(bookmark.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        Ok(removed == 0)
    }

    async fn find_page_by_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<BookmarkView>, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookmarks WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let rows: Vec<BookmarkViewRow> = sqlx::query_as(
            r#"
            SELECT b.novel_id, n.title AS novel_title, n.slug AS novel_slug, b.chapter_number, b.created_at
            FROM bookmarks b
            JOIN novels n ON n.id = b.novel_id
            WHERE b.user_id = ?
            ORDER BY b.created_at DESC, b.novel_id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let items = rows
            .into_iter()
            .map(BookmarkView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as u64, page))
    }
}
