//! Chapter HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    ContentSource, DeleteChapter, ListChapters, ProcessChapterContent, ReadChapter, UpdateChapter,
    UploadChapter,
};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterSummaryView, ChapterView, PageParams, PageResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UploadChapterRequest {
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: Option<String>,
    pub content_url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadChapterResult {
    pub chapter: ChapterView,
    pub chapter_count: u32,
}

/// `content` 与 `content_url` 必须且只能提供一个
#[derive(Debug, Deserialize)]
pub struct ProcessChapterRequest {
    pub novel_id: Uuid,
    pub content: Option<String>,
    pub content_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessedChapterView {
    pub chapter_number: u32,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessChapterResult {
    pub novel_id: Uuid,
    pub created: usize,
    pub chapter_count: u32,
    pub chapters: Vec<ProcessedChapterView>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterLocator {
    pub novel_id: Uuid,
    pub chapter_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub novel_id: Uuid,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteChapterResult {
    pub chapter_count: u32,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传单章（只保存正文地址）
pub async fn upload_chapter(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<UploadChapterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UploadChapterResult>>, ApiError> {
    let Json(req) = payload?;

    let command = UploadChapter {
        actor_id: user.id,
        novel_id: req.novel_id,
        chapter_number: req.chapter_number,
        title: req.title,
        content_url: req.content_url,
    };

    let result = state.upload_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(UploadChapterResult {
        chapter: result.chapter.into(),
        chapter_count: result.chapter_count,
    })))
}

/// 分割整段文本并批量写入章节
pub async fn process_chapter(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<ProcessChapterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProcessChapterResult>>, ApiError> {
    let Json(req) = payload?;

    let source = match (req.content, req.content_url) {
        (Some(content), None) => ContentSource::Inline(content),
        (None, Some(url)) => ContentSource::Url(url),
        _ => {
            return Err(ApiError::BadRequest(
                "exactly one of content or content_url is required".to_string(),
            ))
        }
    };

    let command = ProcessChapterContent {
        actor_id: user.id,
        novel_id: req.novel_id,
        source,
    };

    let result = state.process_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(ProcessChapterResult {
        novel_id: result.novel_id,
        created: result.created,
        chapter_count: result.chapter_count,
        chapters: result
            .chapters
            .into_iter()
            .map(|c| ProcessedChapterView {
                chapter_number: c.chapter_number,
                title: c.title,
            })
            .collect(),
    })))
}

/// 阅读章节（阅读计数异步累加）
pub async fn read_chapter(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChapterLocator>, JsonRejection>,
) -> Result<Json<ApiResponse<ChapterView>>, ApiError> {
    let Json(req) = payload?;

    let chapter = state
        .read_chapter_handler
        .handle(ReadChapter {
            novel_id: req.novel_id,
            chapter_number: req.chapter_number,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 分页列出章节目录
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ListChaptersRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PageResponse<ChapterSummaryView>>>, ApiError> {
    let Json(req) = payload?;

    let page = state
        .list_chapters_handler
        .handle(ListChapters {
            novel_id: req.novel_id,
            page: req.page.to_request(),
        })
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::from_page(
        page,
        ChapterSummaryView::from,
    ))))
}

/// 修改章节标题
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<UpdateChapterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChapterView>>, ApiError> {
    let Json(req) = payload?;

    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            actor_id: user.id,
            novel_id: req.novel_id,
            chapter_number: req.chapter_number,
            title: req.title,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<ChapterLocator>, JsonRejection>,
) -> Result<Json<ApiResponse<DeleteChapterResult>>, ApiError> {
    let Json(req) = payload?;

    let chapter_count = state
        .delete_chapter_handler
        .handle(DeleteChapter {
            actor_id: user.id,
            novel_id: req.novel_id,
            chapter_number: req.chapter_number,
        })
        .await?;

    Ok(Json(ApiResponse::success(DeleteChapterResult { chapter_count })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, test_app, TestApp, FETCHED_TEXT};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    async fn create_novel(app: &TestApp, owner: Uuid) -> String {
        let (status, body) = call(
            app,
            "/api/novel/create",
            Some(owner),
            json!({ "title": "Phàm Nhân Tu Tiên", "author": "Vong Ngữ", "genres": ["Tiên Hiệp"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_process_inline_content() {
        let app = test_app().await;
        let owner = Uuid::new_v4();
        let novel_id = create_novel(&app, owner).await;

        let (status, body) = call(
            &app,
            "/api/chapter/process",
            Some(owner),
            json!({
                "novel_id": novel_id,
                "content": "Chương 1: Mở đầu\nNội dung A\nChương 2\nNội dung B"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["created"], 2);
        assert_eq!(body["data"]["chapter_count"], 2);
        assert_eq!(
            body["data"]["chapters"],
            json!([
                { "chapter_number": 1, "title": "Mở đầu" },
                { "chapter_number": 2, "title": "Chapter 2" }
            ])
        );

        let (status, body) = call(
            &app,
            "/api/chapter/read",
            None,
            json!({ "novel_id": novel_id, "chapter_number": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], "Nội dung A");
        assert_eq!(app.views.recorded().len(), 1);

        // 同样的文本再次处理整体冲突，已有章节不受影响
        let (status, body) = call(
            &app,
            "/api/chapter/process",
            Some(owner),
            json!({ "novel_id": novel_id, "content": "Chương 1\nX\nChương 3\nY" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errno"], 409);

        let (_, body) = call(&app, "/api/chapter/list", None, json!({ "novel_id": novel_id })).await;
        assert_eq!(body["data"]["total"], 2);
        let numbers: Vec<u64> = body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c: &Value| c["chapter_number"].as_u64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_process_fetched_content() {
        let app = test_app().await;
        let owner = Uuid::new_v4();
        let novel_id = create_novel(&app, owner).await;

        let (status, body) = call(
            &app,
            "/api/chapter/process",
            Some(owner),
            json!({ "novel_id": novel_id, "content_url": "https://cdn.example.com/full.txt" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["created"].as_u64().unwrap() as usize,
            FETCHED_TEXT.matches("Chapter ").count()
        );

        let (status, _) = call(
            &app,
            "/api/chapter/process",
            Some(owner),
            json!({ "novel_id": novel_id, "content": "x", "content_url": "https://a/b" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chapter_management() {
        let app = test_app().await;
        let owner = Uuid::new_v4();
        let novel_id = create_novel(&app, owner).await;

        let (status, body) = call(
            &app,
            "/api/chapter/upload",
            Some(owner),
            json!({
                "novel_id": novel_id,
                "chapter_number": 5,
                "content_url": "https://cdn.example.com/5.txt"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chapter_count"], 1);
        assert_eq!(body["data"]["chapter"]["title"], "Chapter 5");

        let (status, _) = call(
            &app,
            "/api/chapter/upload",
            Some(Uuid::new_v4()),
            json!({
                "novel_id": novel_id,
                "chapter_number": 6,
                "content_url": "https://cdn.example.com/6.txt"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(
            &app,
            "/api/chapter/update",
            Some(owner),
            json!({ "novel_id": novel_id, "chapter_number": 5, "title": "Trúc Cơ" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Trúc Cơ");

        let (status, body) = call(
            &app,
            "/api/chapter/delete",
            Some(owner),
            json!({ "novel_id": novel_id, "chapter_number": 5 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chapter_count"], 0);

        let (status, _) = call(
            &app,
            "/api/chapter/read",
            None,
            json!({ "novel_id": novel_id, "chapter_number": 5 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
