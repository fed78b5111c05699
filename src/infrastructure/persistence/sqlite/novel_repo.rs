//! SQLite Novel Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, parse_time, parse_uuid, to_u32, unique_or_db_error};
use super::DbPool;
use crate::application::ports::{
    NovelFilter, NovelRecord, NovelRepositoryPort, NovelStatus, Page, PageRequest,
    RepositoryError,
};

const NOVEL_COLUMNS: &str = "id, slug, title, author, description, cover_image_url, genres, status, chapter_count, uploader_id, created_at, updated_at";

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: String,
    slug: String,
    title: String,
    author: String,
    description: String,
    cover_image_url: Option<String>,
    genres: String,
    status: String,
    chapter_count: i64,
    uploader_id: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        Ok(NovelRecord {
            id: parse_uuid(&row.id)?,
            slug: row.slug,
            title: row.title,
            author: row.author,
            description: row.description,
            cover_image_url: row.cover_image_url,
            genres: serde_json::from_str(&row.genres)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            status: NovelStatus::parse(&row.status)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            chapter_count: to_u32(row.chapter_count)?,
            uploader_id: parse_uuid(&row.uploader_id)?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

fn genres_json(genres: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(genres).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

/// LIKE 模式转义
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// 由过滤条件生成 WHERE 子句和绑定参数
fn filter_clause(filter: &NovelFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(genre) = &filter.genre {
        conditions.push(
            "EXISTS (SELECT 1 FROM json_each(novels.genres) WHERE lower(json_each.value) = lower(?))",
        );
        binds.push(genre.clone());
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?");
        binds.push(status.as_str().to_string());
    }
    if let Some(uploader_id) = filter.uploader_id {
        conditions.push("uploader_id = ?");
        binds.push(uploader_id.to_string());
    }
    if let Some(search) = &filter.search {
        conditions.push("title LIKE ? ESCAPE '\\'");
        binds.push(like_pattern(search));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novels (id, slug, title, author, description, cover_image_url, genres, status, chapter_count, uploader_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(novel.id.to_string())
        .bind(&novel.slug)
        .bind(&novel.title)
        .bind(&novel.author)
        .bind(&novel.description)
        .bind(&novel.cover_image_url)
        .bind(genres_json(&novel.genres)?)
        .bind(novel.status.as_str())
        .bind(novel.chapter_count as i64)
        .bind(novel.uploader_id.to_string())
        .bind(novel.created_at.to_rfc3339())
        .bind(novel.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or_db_error(e, || format!("novel slug '{}'", novel.slug)))?;

        Ok(())
    }

    async fn update(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE novels
            SET title = ?, author = ?, description = ?, cover_image_url = ?, genres = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&novel.title)
        .bind(&novel.author)
        .bind(&novel.description)
        .bind(&novel.cover_image_url)
        .bind(genres_json(&novel.genres)?)
        .bind(novel.status.as_str())
        .bind(novel.updated_at.to_rfc3339())
        .bind(novel.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("novel {}", novel.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> =
            sqlx::query_as(&format!("SELECT {} FROM novels WHERE id = ?", NOVEL_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> =
            sqlx::query_as(&format!("SELECT {} FROM novels WHERE slug = ?", NOVEL_COLUMNS))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM novels WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn find_page(
        &self,
        filter: &NovelFilter,
        page: &PageRequest,
    ) -> Result<Page<NovelRecord>, RepositoryError> {
        let (clause, binds) = filter_clause(filter);

        let count_sql = format!("SELECT COUNT(*) FROM novels{}", clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value);
        }
        let (total,) = count_query.fetch_one(&self.pool).await.map_err(db_error)?;

        let select_sql = format!(
            "SELECT {} FROM novels{} ORDER BY updated_at DESC, id LIMIT ? OFFSET ?",
            NOVEL_COLUMNS, clause
        );
        let mut select_query = sqlx::query_as::<_, NovelRow>(&select_sql);
        for value in &binds {
            select_query = select_query.bind(value);
        }
        let rows = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let items = rows
            .into_iter()
            .map(NovelRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as u64, page))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let novel_id = id.to_string();

        sqlx::query(
            "DELETE FROM comment_likes WHERE comment_id IN (SELECT id FROM comments WHERE novel_id = ?)",
        )
        .bind(&novel_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        for sql in [
            "DELETE FROM comments WHERE novel_id = ?",
            "DELETE FROM bookmarks WHERE novel_id = ?",
            "DELETE FROM chapters WHERE novel_id = ?",
        ] {
            sqlx::query(sql)
                .bind(&novel_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        let result = sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(&novel_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            // tx 被丢弃时自动回滚
            return Err(RepositoryError::NotFound(format!("novel {}", id)));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }
}
