//! 测试辅助：内存数据库、记录构造器和端口替身

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::application::ports::{
    BookmarkRepositoryPort, ChapterRecord, ChapterRepositoryPort, CommentRepositoryPort,
    ContentFetcherPort, FetchError, NovelRecord, NovelRepositoryPort, NovelStatus,
    ViewCountQueuePort,
};
use crate::domain::ChapterSegmenter;
use crate::infrastructure::adapters::FileObjectStorage;
use crate::infrastructure::http::auth::{USER_ID_HEADER, USER_NAME_HEADER};
use crate::infrastructure::http::{build_router, AppPorts, AppSettings, AppState, ServerConfig};
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteBookmarkRepository,
    SqliteChapterRepository, SqliteCommentRepository, SqliteNovelRepository,
};

/// 已迁移的内存数据库
pub async fn test_pool() -> DbPool {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn novel_record(uploader_id: Uuid, slug: &str) -> NovelRecord {
    let now = Utc::now();
    NovelRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: format!("Truyện {}", slug),
        author: "Ngã Cật Tây Hồng Thị".to_string(),
        description: String::new(),
        cover_image_url: None,
        genres: vec!["Tiên Hiệp".to_string()],
        status: NovelStatus::Ongoing,
        chapter_count: 0,
        uploader_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn chapter_record(novel_id: Uuid, chapter_number: u32) -> ChapterRecord {
    let now = Utc::now();
    ChapterRecord {
        id: Uuid::new_v4(),
        novel_id,
        chapter_number,
        title: format!("Chapter {}", chapter_number),
        content: Some(format!("Nội dung chương {}", chapter_number)),
        content_url: None,
        view_count: 0,
        created_at: now,
        updated_at: now,
    }
}

/// 应用层测试夹具
pub struct Fixture {
    pub pool: DbPool,
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub comment_repo: Arc<dyn CommentRepositoryPort>,
    pub bookmark_repo: Arc<dyn BookmarkRepositoryPort>,
}

impl Fixture {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        Self {
            novel_repo: Arc::new(SqliteNovelRepository::new(pool.clone())),
            chapter_repo: Arc::new(SqliteChapterRepository::new(pool.clone())),
            comment_repo: Arc::new(SqliteCommentRepository::new(pool.clone())),
            bookmark_repo: Arc::new(SqliteBookmarkRepository::new(pool.clone())),
            pool,
        }
    }

    pub async fn create_novel(&self, uploader_id: Uuid) -> NovelRecord {
        let slug = format!("novel-{}", Uuid::new_v4().simple());
        let novel = novel_record(uploader_id, &slug);
        self.novel_repo.save(&novel).await.unwrap();
        novel
    }
}

enum Reply {
    Text(String),
    Failed(String),
    Timeout,
}

/// 返回固定结果的 ContentFetcher
pub struct StaticFetcher {
    reply: Reply,
    delay: Option<Duration>,
}

impl StaticFetcher {
    pub fn text(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            delay: None,
        }
    }

    pub fn error(err: FetchError) -> Self {
        let reply = match err {
            FetchError::Timeout => Reply::Timeout,
            FetchError::Failed(msg) => Reply::Failed(msg),
            other => Reply::Failed(other.to_string()),
        };
        Self { reply, delay: None }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ContentFetcherPort for StaticFetcher {
    async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failed(msg) => Err(FetchError::Failed(msg.clone())),
            Reply::Timeout => Err(FetchError::Timeout),
        }
    }
}

/// 记录入队章节的 ViewCountQueue
pub struct RecordingViewQueue {
    accept: bool,
    recorded: Mutex<Vec<Uuid>>,
}

impl RecordingViewQueue {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn full() -> Self {
        Self {
            accept: false,
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<Uuid> {
        self.recorded.lock().unwrap().clone()
    }
}

impl ViewCountQueuePort for RecordingViewQueue {
    fn enqueue(&self, chapter_id: Uuid) -> bool {
        if self.accept {
            self.recorded.lock().unwrap().push(chapter_id);
        }
        self.accept
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// 测试应用中 content_url 拉取返回的文本
pub const FETCHED_TEXT: &str = "Chapter 1: Khởi đầu\nA\nChapter 2\nB\nChapter 3\nC";

/// 基于内存数据库和临时目录的完整 Router
pub struct TestApp {
    pub router: Router,
    pub fixture: Fixture,
    pub views: Arc<RecordingViewQueue>,
    _objects: TempDir,
}

pub async fn test_app() -> TestApp {
    let fixture = Fixture::new().await;
    let objects = tempfile::tempdir().unwrap();
    let storage = FileObjectStorage::new(objects.path(), "http://localhost:5060/files")
        .await
        .unwrap();
    let views = Arc::new(RecordingViewQueue::accepting());

    let ports = AppPorts {
        novel_repo: fixture.novel_repo.clone(),
        chapter_repo: fixture.chapter_repo.clone(),
        comment_repo: fixture.comment_repo.clone(),
        bookmark_repo: fixture.bookmark_repo.clone(),
        fetcher: Arc::new(StaticFetcher::text(FETCHED_TEXT)),
        storage: Arc::new(storage),
        view_queue: views.clone(),
    };
    let state = AppState::new(
        ports,
        AppSettings::with_segmenter(ChapterSegmenter::with_default_markers().unwrap()),
    );
    let config = ServerConfig::default().with_files_dir(objects.path());

    TestApp {
        router: build_router(&config, Arc::new(state)),
        fixture,
        views,
        _objects: objects,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

async fn send_json(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post(path: &str, user: Option<Uuid>) -> axum::http::request::Builder {
    let builder = Request::builder().method("POST").uri(path);
    match user {
        Some(id) => builder.header(USER_ID_HEADER, id.to_string()),
        None => builder,
    }
}

/// POST JSON，可选 `X-User-Id`
pub async fn call(app: &TestApp, path: &str, user: Option<Uuid>, body: Value) -> (StatusCode, Value) {
    let request = post(path, user)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send_json(app, request).await
}

/// POST JSON，同时带 `X-User-Name`
pub async fn call_as(
    app: &TestApp,
    path: &str,
    user: Uuid,
    name: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = post(path, Some(user))
        .header(USER_NAME_HEADER, name)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send_json(app, request).await
}

/// POST multipart，文件放在 `file` 字段
pub async fn call_multipart(
    app: &TestApp,
    path: &str,
    user: Option<Uuid>,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (StatusCode, Value) {
    const BOUNDARY: &str = "truyen-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = post(path, user)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send_json(app, request).await
}

/// GET，返回原始响应体
pub async fn get(app: &TestApp, path: &str) -> (StatusCode, Bytes) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}
