//! HTTP Routes
//!
//! API Endpoints（除 ping 外均为 POST + JSON 请求体）:
//! - /api/ping                  GET   健康检查
//! - /api/novel/create          POST  创建小说
//! - /api/novel/update          POST  更新小说（上传者）
//! - /api/novel/delete          POST  删除小说（上传者）
//! - /api/novel/get             POST  按 id 或 slug 获取小说
//! - /api/novel/list            POST  分页列出小说
//! - /api/chapter/upload        POST  上传单章（正文地址）
//! - /api/chapter/process       POST  分割整段文本为章节
//! - /api/chapter/read          POST  阅读章节
//! - /api/chapter/list          POST  章节目录
//! - /api/chapter/update        POST  修改章节标题
//! - /api/chapter/delete        POST  删除章节
//! - /api/upload/chapter_text   POST  multipart 上传章节文本
//! - /api/upload/cover          POST  multipart 上传封面
//! - /api/comment/create        POST  发表评论
//! - /api/comment/list          POST  评论列表
//! - /api/comment/delete        POST  删除评论（作者）
//! - /api/comment/like          POST  点赞切换
//! - /api/bookmark/toggle       POST  书签切换
//! - /api/bookmark/list         POST  我的书签

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novel", novel_routes())
        .nest("/chapter", chapter_routes())
        .nest("/upload", upload_routes())
        .nest("/comment", comment_routes())
        .nest("/bookmark", bookmark_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_novel))
        .route("/update", post(handlers::update_novel))
        .route("/delete", post(handlers::delete_novel))
        .route("/get", post(handlers::get_novel))
        .route("/list", post(handlers::list_novels))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_chapter))
        .route("/process", post(handlers::process_chapter))
        .route("/read", post(handlers::read_chapter))
        .route("/list", post(handlers::list_chapters))
        .route("/update", post(handlers::update_chapter))
        .route("/delete", post(handlers::delete_chapter))
}

/// Upload 路由
fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chapter_text", post(handlers::upload_chapter_text))
        .route("/cover", post(handlers::upload_cover))
}

/// Comment 路由
fn comment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_comment))
        .route("/list", post(handlers::list_comments))
        .route("/delete", post(handlers::delete_comment))
        .route("/like", post(handlers::like_comment))
}

/// Bookmark 路由
fn bookmark_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/toggle", post(handlers::toggle_bookmark))
        .route("/list", post(handlers::list_bookmarks))
}
