//! Comment Context - Value Objects

use super::CommentError;

/// 评论最大字符数
pub const MAX_COMMENT_CHARS: usize = 2000;

/// 评论内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(content: impl Into<String>) -> Result<Self, CommentError> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(CommentError::InvalidContent(
                "comment cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_COMMENT_CHARS {
            return Err(CommentError::InvalidContent(format!(
                "comment cannot exceed {} characters",
                MAX_COMMENT_CHARS
            )));
        }
        Ok(Self(content))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content_bounds() {
        assert!(CommentContent::new(" \n ").is_err());
        assert!(CommentContent::new("x".repeat(MAX_COMMENT_CHARS + 1)).is_err());
        assert_eq!(CommentContent::new(" hay quá ").unwrap().into_inner(), "hay quá");
    }
}
