//! View Count Queue Port
//!
//! 阅读计数是尽力而为的后台任务：请求只负责入队，由 worker 写库

use uuid::Uuid;

/// View Count Queue Port
pub trait ViewCountQueuePort: Send + Sync {
    /// 入队一次阅读；队列已满或已关闭时丢弃并返回 false
    fn enqueue(&self, chapter_id: Uuid) -> bool;
}
