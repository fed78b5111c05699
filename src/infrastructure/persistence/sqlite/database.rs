//! SQLite Database - 数据库连接和迁移

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use uuid::Uuid;

use crate::application::ports::RepositoryError;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/truyen.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and busy_timeout=5000ms");

    Ok(pool)
}

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "novels",
        r#"
        CREATE TABLE IF NOT EXISTS novels (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            cover_image_url TEXT,
            genres TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'ongoing',
            chapter_count INTEGER NOT NULL DEFAULT 0,
            uploader_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "chapters",
        r#"
        CREATE TABLE IF NOT EXISTS chapters (
            id TEXT PRIMARY KEY,
            novel_id TEXT NOT NULL,
            chapter_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT,
            content_url TEXT,
            view_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE,
            UNIQUE (novel_id, chapter_number)
        )
        "#,
    ),
    (
        "comments",
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            novel_id TEXT NOT NULL,
            chapter_number INTEGER,
            author_id TEXT NOT NULL,
            author_name TEXT NOT NULL,
            content TEXT NOT NULL,
            like_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "comment_likes",
        r#"
        CREATE TABLE IF NOT EXISTS comment_likes (
            comment_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (comment_id, user_id),
            FOREIGN KEY (comment_id) REFERENCES comments(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "bookmarks",
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            user_id TEXT NOT NULL,
            novel_id TEXT NOT NULL,
            chapter_number INTEGER,
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, novel_id),
            FOREIGN KEY (novel_id) REFERENCES novels(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "idx_novels_updated_at",
        "CREATE INDEX IF NOT EXISTS idx_novels_updated_at ON novels(updated_at)",
    ),
    (
        "idx_novels_uploader_id",
        "CREATE INDEX IF NOT EXISTS idx_novels_uploader_id ON novels(uploader_id)",
    ),
    (
        "idx_comments_novel_chapter",
        "CREATE INDEX IF NOT EXISTS idx_comments_novel_chapter ON comments(novel_id, chapter_number, created_at)",
    ),
    (
        "idx_bookmarks_user",
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_user ON bookmarks(user_id, created_at)",
    ),
];

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    for &(name, sql) in MIGRATIONS {
        sqlx::query(sql).execute(pool).await?;
        tracing::debug!(migration = name, "Migration applied");
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

// ============================================================================
// 行转换辅助
// ============================================================================

pub(crate) fn db_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(err.to_string())
}

/// 唯一约束冲突映射为 Duplicate
pub(crate) fn unique_or_db_error(err: sqlx::Error, what: impl FnOnce() -> String) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Duplicate(what()),
        _ => db_error(err),
    }
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn to_u32(value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["bookmarks", "chapters", "comment_likes", "comments", "novels"]
        );
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_time("2024-01-01T00:00:00+00:00").is_ok());
        assert!(to_u32(-1).is_err());
        assert_eq!(to_u32(7).unwrap(), 7);
    }
}
