//! Comment Context - 评论限界上下文

mod errors;
mod value_objects;

pub use errors::CommentError;
pub use value_objects::{CommentContent, MAX_COMMENT_CHARS};
