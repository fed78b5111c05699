//! Worker Layer - Background Task Processing
//!
//! 实现 ViewCountWorker，异步累加章节阅读数

mod view_count_worker;

pub use view_count_worker::{ChannelViewCountQueue, ViewCountWorker, ViewCountWorkerConfig};
