//! Bookmark HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{ListBookmarks, ToggleBookmark};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{ApiResponse, BookmarkItemView, PageParams, PageResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleBookmarkRequest {
    pub novel_id: Uuid,
    /// 阅读进度，仅在新建书签时记录
    pub chapter_number: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BookmarkToggleView {
    pub bookmarked: bool,
}

/// 添加 / 移除书签
pub async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<ToggleBookmarkRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BookmarkToggleView>>, ApiError> {
    let Json(req) = payload?;

    let bookmarked = state
        .toggle_bookmark_handler
        .handle(ToggleBookmark {
            user_id: user.id,
            novel_id: req.novel_id,
            chapter_number: req.chapter_number,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookmarkToggleView { bookmarked })))
}

/// 列出当前用户的书签
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<PageParams>, JsonRejection>,
) -> Result<Json<ApiResponse<PageResponse<BookmarkItemView>>>, ApiError> {
    let Json(page) = payload?;

    let page = state
        .list_bookmarks_handler
        .handle(ListBookmarks {
            user_id: user.id,
            page: page.to_request(),
        })
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::from_page(
        page,
        BookmarkItemView::from,
    ))))
}
