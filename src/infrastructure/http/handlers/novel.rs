//! Novel HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateNovel, DeleteNovel, GetNovel, ListNovels, NovelFilter, NovelLookup, NovelStatus,
    UpdateNovel,
};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{ApiResponse, Empty, NovelView, PageParams, PageResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNovelRequest {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNovelRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteNovelRequest {
    pub id: Uuid,
}

/// 按 id 或 slug 查询，二者至少提供一个
#[derive(Debug, Deserialize)]
pub struct GetNovelRequest {
    pub id: Option<Uuid>,
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListNovelsRequest {
    pub genre: Option<String>,
    pub status: Option<String>,
    pub uploader_id: Option<Uuid>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建小说
pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CreateNovelRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NovelView>>, ApiError> {
    let Json(req) = payload?;

    let command = CreateNovel {
        uploader_id: user.id,
        title: req.title,
        author: req.author,
        description: req.description,
        cover_image_url: req.cover_image_url,
        genres: req.genres,
        status: req.status,
    };

    let novel = state.create_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 更新小说元数据
pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<UpdateNovelRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NovelView>>, ApiError> {
    let Json(req) = payload?;

    let command = UpdateNovel {
        actor_id: user.id,
        novel_id: req.id,
        title: req.title,
        author: req.author,
        description: req.description,
        cover_image_url: req.cover_image_url,
        genres: req.genres,
        status: req.status,
    };

    let novel = state.update_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 删除小说及其章节、评论、书签
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<DeleteNovelRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Json(req) = payload?;

    state
        .delete_novel_handler
        .handle(DeleteNovel {
            actor_id: user.id,
            novel_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 获取小说详情
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GetNovelRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NovelView>>, ApiError> {
    let Json(req) = payload?;

    let lookup = match (req.id, req.slug) {
        (Some(id), _) => NovelLookup::Id(id),
        (None, Some(slug)) if !slug.trim().is_empty() => NovelLookup::Slug(slug.trim().to_string()),
        _ => return Err(ApiError::BadRequest("id or slug is required".to_string())),
    };

    let novel = state.get_novel_handler.handle(GetNovel { lookup }).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 分页列出小说
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ListNovelsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PageResponse<NovelView>>>, ApiError> {
    let Json(req) = payload?;

    let status = req
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(NovelStatus::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let query = ListNovels {
        filter: NovelFilter {
            genre: req.genre,
            status,
            uploader_id: req.uploader_id,
            search: req.search,
        },
        page: req.page.to_request(),
    };

    let page = state.list_novels_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(PageResponse::from_page(
        page,
        NovelView::from,
    ))))
}
