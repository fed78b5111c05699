//! SQLite Comment Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_time, parse_uuid, to_u32};
use super::DbPool;
use crate::application::ports::{
    CommentRecord, CommentRepositoryPort, LikeToggle, Page, PageRequest, RepositoryError,
};

const COMMENT_COLUMNS: &str =
    "id, novel_id, chapter_number, author_id, author_name, content, like_count, created_at";

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: String,
    novel_id: String,
    chapter_number: Option<i64>,
    author_id: String,
    author_name: String,
    content: String,
    like_count: i64,
    created_at: String,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: parse_uuid(&row.id)?,
            novel_id: parse_uuid(&row.novel_id)?,
            chapter_number: row.chapter_number.map(to_u32).transpose()?,
            author_id: parse_uuid(&row.author_id)?,
            author_name: row.author_name,
            content: row.content,
            like_count: row.like_count.max(0) as u64,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn save(&self, comment: &CommentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, novel_id, chapter_number, author_id, author_name, content, like_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.novel_id.to_string())
        .bind(comment.chapter_number.map(i64::from))
        .bind(comment.author_id.to_string())
        .bind(&comment.author_name)
        .bind(&comment.content)
        .bind(comment.like_count as i64)
        .bind(comment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CommentRecord>, RepositoryError> {
        let row: Option<CommentRow> =
            sqlx::query_as(&format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(CommentRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        novel_id: Uuid,
        chapter_number: Option<u32>,
        page: &PageRequest,
    ) -> Result<Page<CommentRecord>, RepositoryError> {
        // `chapter_number IS ?` 对 NULL 同样成立
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM comments WHERE novel_id = ? AND chapter_number IS ?",
        )
        .bind(novel_id.to_string())
        .bind(chapter_number.map(i64::from))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM comments WHERE novel_id = ? AND chapter_number IS ? ORDER BY created_at DESC, id LIMIT ? OFFSET ?",
            COMMENT_COLUMNS
        ))
        .bind(novel_id.to_string())
        .bind(chapter_number.map(i64::from))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let items = rows
            .into_iter()
            .map(CommentRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as u64, page))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM comment_likes WHERE comment_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("comment {}", id)));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<LikeToggle, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM comments WHERE id = ?")
            .bind(comment_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound(format!("comment {}", comment_id)));
        }

        let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query("INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(comment_id.to_string())
                .bind(user_id.to_string())
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        sqlx::query(
            "UPDATE comments SET like_count = (SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?) WHERE id = ?",
        )
        .bind(comment_id.to_string())
        .bind(comment_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        let (like_count,): (i64,) = sqlx::query_as("SELECT like_count FROM comments WHERE id = ?")
            .bind(comment_id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(LikeToggle {
            liked,
            like_count: like_count.max(0) as u64,
        })
    }
}
