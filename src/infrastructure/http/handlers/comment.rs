//! Comment HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CreateComment, DeleteComment, ListComments, ToggleCommentLike};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{ApiResponse, CommentView, Empty, PageParams, PageResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsRequest {
    pub novel_id: Uuid,
    pub chapter_number: Option<u32>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
pub struct CommentIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LikeToggleView {
    pub liked: bool,
    pub like_count: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// 发表评论，作者名取自 `X-User-Name`
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let Json(req) = payload?;

    let command = CreateComment {
        author_id: user.id,
        author_name: user.name,
        novel_id: req.novel_id,
        chapter_number: req.chapter_number,
        content: req.content,
    };

    let comment = state.create_comment_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(comment.into())))
}

/// 分页列出评论（最新在前）
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ListCommentsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PageResponse<CommentView>>>, ApiError> {
    let Json(req) = payload?;

    let page = state
        .list_comments_handler
        .handle(ListComments {
            novel_id: req.novel_id,
            chapter_number: req.chapter_number,
            page: req.page.to_request(),
        })
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::from_page(
        page,
        CommentView::from,
    ))))
}

/// 删除评论（仅作者）
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CommentIdRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Json(req) = payload?;

    state
        .delete_comment_handler
        .handle(DeleteComment {
            actor_id: user.id,
            comment_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 点赞 / 取消点赞
pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CommentIdRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LikeToggleView>>, ApiError> {
    let Json(req) = payload?;

    let toggle = state
        .toggle_comment_like_handler
        .handle(ToggleCommentLike {
            user_id: user.id,
            comment_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(LikeToggleView {
        liked: toggle.liked,
        like_count: toggle.like_count,
    })))
}
