//! SQLite Chapter Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::database::{db_error, parse_time, parse_uuid, to_u32, unique_or_db_error};
use super::DbPool;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, ChapterSummary, Page, PageRequest, RepositoryError,
};

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    chapter_number: i64,
    title: String,
    content: Option<String>,
    content_url: Option<String>,
    view_count: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            novel_id: parse_uuid(&row.novel_id)?,
            chapter_number: to_u32(row.chapter_number)?,
            title: row.title,
            content: row.content,
            content_url: row.content_url,
            view_count: row.view_count.max(0) as u64,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterSummaryRow {
    id: String,
    chapter_number: i64,
    title: String,
    view_count: i64,
    created_at: String,
}

impl TryFrom<ChapterSummaryRow> for ChapterSummary {
    type Error = RepositoryError;

    fn try_from(row: ChapterSummaryRow) -> Result<Self, Self::Error> {
        Ok(ChapterSummary {
            id: parse_uuid(&row.id)?,
            chapter_number: to_u32(row.chapter_number)?,
            title: row.title,
            view_count: row.view_count.max(0) as u64,
            created_at: parse_time(&row.created_at)?,
        })
    }
}

/// 按行数重算 chapter_count，返回新值
async fn recount_chapters(
    conn: &mut SqliteConnection,
    novel_id: Uuid,
) -> Result<u32, RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE novels
        SET chapter_count = (SELECT COUNT(*) FROM chapters WHERE novel_id = ?),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(novel_id.to_string())
    .bind(Utc::now().to_rfc3339())
    .bind(novel_id.to_string())
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(format!("novel {}", novel_id)));
    }

    let (count,): (i64,) = sqlx::query_as("SELECT chapter_count FROM novels WHERE id = ?")
        .bind(novel_id.to_string())
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error)?;

    to_u32(count)
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn insert_batch(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<u32, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for chapter in chapters {
            sqlx::query(
                r#"
                INSERT INTO chapters (id, novel_id, chapter_number, title, content, content_url, view_count, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chapter.id.to_string())
            .bind(novel_id.to_string())
            .bind(chapter.chapter_number as i64)
            .bind(&chapter.title)
            .bind(&chapter.content)
            .bind(&chapter.content_url)
            .bind(chapter.view_count as i64)
            .bind(chapter.created_at.to_rfc3339())
            .bind(chapter.updated_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                unique_or_db_error(e, || {
                    format!("chapter {} already exists", chapter.chapter_number)
                })
            })?;
        }

        let chapter_count = recount_chapters(&mut *tx, novel_id).await?;

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(
            novel_id = %novel_id,
            inserted = chapters.len(),
            chapter_count = chapter_count,
            "Chapters inserted"
        );

        Ok(chapter_count)
    }

    async fn find_by_number(
        &self,
        novel_id: Uuid,
        chapter_number: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(
            "SELECT id, novel_id, chapter_number, title, content, content_url, view_count, created_at, updated_at FROM chapters WHERE novel_id = ? AND chapter_number = ?",
        )
        .bind(novel_id.to_string())
        .bind(chapter_number as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        novel_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<ChapterSummary>, RepositoryError> {
        let total = self.count_by_novel(novel_id).await?;

        let rows: Vec<ChapterSummaryRow> = sqlx::query_as(
            "SELECT id, chapter_number, title, view_count, created_at FROM chapters WHERE novel_id = ? ORDER BY chapter_number LIMIT ? OFFSET ?",
        )
        .bind(novel_id.to_string())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let items = rows
            .into_iter()
            .map(ChapterSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as u64, page))
    }

    async fn update_title(&self, chapter_id: Uuid, title: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chapters SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(Utc::now().to_rfc3339())
            .bind(chapter_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", chapter_id)));
        }
        Ok(())
    }

    async fn delete(&self, novel_id: Uuid, chapter_number: u32) -> Result<u32, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query("DELETE FROM chapters WHERE novel_id = ? AND chapter_number = ?")
            .bind(novel_id.to_string())
            .bind(chapter_number as i64)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "chapter {} of novel {}",
                chapter_number, novel_id
            )));
        }

        // 章节评论随章节一起删除
        sqlx::query(
            "DELETE FROM comment_likes WHERE comment_id IN (SELECT id FROM comments WHERE novel_id = ? AND chapter_number = ?)",
        )
        .bind(novel_id.to_string())
        .bind(chapter_number as i64)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query("DELETE FROM comments WHERE novel_id = ? AND chapter_number = ?")
            .bind(novel_id.to_string())
            .bind(chapter_number as i64)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let chapter_count = recount_chapters(&mut *tx, novel_id).await?;

        tx.commit().await.map_err(db_error)?;

        Ok(chapter_count)
    }

    async fn increment_view_count(&self, chapter_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chapters SET view_count = view_count + 1 WHERE id = ?")
            .bind(chapter_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", chapter_id)));
        }
        Ok(())
    }

    async fn count_by_novel(&self, novel_id: Uuid) -> Result<u32, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        to_u32(count)
    }
}
