//! Truyen - 连载小说发布与阅读服务
//!
//! 启动顺序：配置 → 日志 → 数据库 → 适配器 → 阅读计数 Worker → HTTP 服务器
//! 关闭顺序：HTTP 服务器 → Worker 排空队列 → 关闭连接池

use std::sync::Arc;

use truyen::application::UploadLimits;
use truyen::config::{load_config, print_config, LogConfig};
use truyen::domain::ChapterSegmenter;
use truyen::infrastructure::adapters::{
    FileObjectStorage, HttpContentFetcher, HttpContentFetcherConfig,
};
use truyen::infrastructure::http::{AppPorts, AppSettings, AppState, HttpServer, ServerConfig};
use truyen::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteBookmarkRepository,
    SqliteChapterRepository, SqliteCommentRepository, SqliteNovelRepository,
};
use truyen::infrastructure::worker::{ViewCountWorker, ViewCountWorkerConfig};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},truyen={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Truyen - 连载小说服务");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.objects_dir).await?;
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let comment_repo = Arc::new(SqliteCommentRepository::new(pool.clone()));
    let bookmark_repo = Arc::new(SqliteBookmarkRepository::new(pool.clone()));

    // 外部文本拉取
    let fetcher_config = HttpContentFetcherConfig::default()
        .with_timeout(config.fetch.timeout_secs)
        .with_max_content_bytes(config.fetch.max_content_bytes);
    let fetcher = Arc::new(HttpContentFetcher::new(fetcher_config)?);

    // 对象存储，通过 /files 公开
    let storage = Arc::new(
        FileObjectStorage::new(&config.storage.objects_dir, config.server.files_base_url()).await?,
    );

    // 阅读计数队列与 Worker
    let worker_config = ViewCountWorkerConfig {
        queue_capacity: config.worker.view_count_queue_capacity,
    };
    let (view_queue, worker) = ViewCountWorker::channel(&worker_config, chapter_repo.clone());
    let worker_handle = tokio::spawn(worker.run());

    let ports = AppPorts {
        novel_repo,
        chapter_repo,
        comment_repo,
        bookmark_repo,
        fetcher,
        storage,
        view_queue: Arc::new(view_queue),
    };
    let settings = AppSettings {
        segmenter: ChapterSegmenter::with_default_markers()?,
        fetch_timeout: config.fetch.timeout(),
        upload_limits: UploadLimits {
            max_chapter_text_bytes: config.storage.max_chapter_text_bytes,
            max_cover_image_bytes: config.storage.max_cover_image_bytes,
            timeout: config.storage.upload_timeout(),
        },
    };
    let state = AppState::new(ports, settings);

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_files_dir(&config.storage.objects_dir)
        .with_body_limit(config.storage.body_limit_bytes());
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                // 无法监听信号时保持运行
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 服务器返回后 AppState 已释放，队列发送端随之关闭
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "ViewCountWorker task failed");
    }

    pool.close().await;

    tracing::info!("Server shutdown complete");

    Ok(())
}
