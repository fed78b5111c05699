//! Caller Identity
//!
//! 身份由上游网关注入 `X-User-Id`（UUID）与可选的 `X-User-Name`

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// 已认证的调用者
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let id = raw
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))?;

        let name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self { id, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> Result<CurrentUser, ApiError> {
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_identity() {
        let id = Uuid::new_v4();
        let user = extract(
            Request::builder()
                .header(USER_ID_HEADER, id.to_string())
                .header(USER_NAME_HEADER, " Lan "),
        )
        .await
        .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name.as_deref(), Some("Lan"));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_identity() {
        assert!(matches!(
            extract(Request::builder()).await,
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            extract(Request::builder().header(USER_ID_HEADER, "bob")).await,
            Err(ApiError::Unauthorized(_))
        ));
    }
}
