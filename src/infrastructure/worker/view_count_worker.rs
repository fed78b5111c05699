//! View Count Worker - Background Chapter View Counter

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::{ChapterRepositoryPort, RepositoryError, ViewCountQueuePort};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct ViewCountWorkerConfig {
    /// 队列容量，满时新的阅读事件被丢弃
    pub queue_capacity: usize,
}

impl Default for ViewCountWorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
        }
    }
}

/// 基于 mpsc 的有界阅读计数队列
#[derive(Clone)]
pub struct ChannelViewCountQueue {
    sender: mpsc::Sender<Uuid>,
}

impl ViewCountQueuePort for ChannelViewCountQueue {
    fn enqueue(&self, chapter_id: Uuid) -> bool {
        self.sender.try_send(chapter_id).is_ok()
    }
}

/// 阅读计数 Worker
///
/// 从队列消费章节 ID 并累加 view_count；所有发送端释放后退出
pub struct ViewCountWorker {
    queue_receiver: mpsc::Receiver<Uuid>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ViewCountWorker {
    /// 创建队列和对应的 Worker
    pub fn channel(
        config: &ViewCountWorkerConfig,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> (ChannelViewCountQueue, Self) {
        let (sender, queue_receiver) = mpsc::channel(config.queue_capacity.max(1));
        (
            ChannelViewCountQueue { sender },
            Self {
                queue_receiver,
                chapter_repo,
            },
        )
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!("ViewCountWorker started");

        let mut processed = 0u64;
        while let Some(chapter_id) = self.queue_receiver.recv().await {
            match self.chapter_repo.increment_view_count(chapter_id).await {
                Ok(()) => processed += 1,
                Err(RepositoryError::NotFound(_)) => {
                    // 章节在入队后被删除
                    tracing::debug!(chapter_id = %chapter_id, "Chapter gone, view dropped");
                }
                Err(e) => {
                    tracing::error!(chapter_id = %chapter_id, error = %e, "Failed to record view");
                }
            }
        }

        tracing::info!(processed = processed, "ViewCountWorker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ReadChapter, ReadChapterHandler};
    use crate::test_support::{chapter_record, Fixture};

    #[tokio::test]
    async fn test_worker_increments_and_stops() {
        let fx = Fixture::new().await;
        let novel = fx.create_novel(Uuid::new_v4()).await;
        fx.chapter_repo
            .insert_batch(novel.id, &[chapter_record(novel.id, 1)])
            .await
            .unwrap();
        let chapter = fx.chapter_repo.find_by_number(novel.id, 1).await.unwrap().unwrap();

        let (queue, worker) =
            ViewCountWorker::channel(&ViewCountWorkerConfig::default(), fx.chapter_repo.clone());
        assert!(queue.enqueue(chapter.id));
        assert!(queue.enqueue(chapter.id));
        assert!(queue.enqueue(Uuid::new_v4()));
        drop(queue);

        // 发送端全部释放后 run 返回
        worker.run().await;

        let chapter = fx.chapter_repo.find_by_number(novel.id, 1).await.unwrap().unwrap();
        assert_eq!(chapter.view_count, 2);
    }

    #[tokio::test]
    async fn test_read_once_adds_exactly_one_view() {
        let fx = Fixture::new().await;
        let novel = fx.create_novel(Uuid::new_v4()).await;
        fx.chapter_repo
            .insert_batch(novel.id, &[chapter_record(novel.id, 1), chapter_record(novel.id, 2)])
            .await
            .unwrap();

        let (queue, worker) =
            ViewCountWorker::channel(&ViewCountWorkerConfig::default(), fx.chapter_repo.clone());
        let worker = tokio::spawn(worker.run());
        let reader = ReadChapterHandler::new(fx.chapter_repo.clone(), Arc::new(queue));

        let chapter = reader
            .handle(ReadChapter {
                novel_id: novel.id,
                chapter_number: 1,
            })
            .await
            .unwrap();
        assert_eq!(chapter.view_count, 0);

        // 释放最后一个发送端，Worker 排空后退出
        drop(reader);
        worker.await.unwrap();

        let first = fx.chapter_repo.find_by_number(novel.id, 1).await.unwrap().unwrap();
        let second = fx.chapter_repo.find_by_number(novel.id, 2).await.unwrap().unwrap();
        assert_eq!(first.view_count, 1);
        assert_eq!(second.view_count, 0);
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let fx = Fixture::new().await;
        let (queue, _worker) = ViewCountWorker::channel(
            &ViewCountWorkerConfig { queue_capacity: 1 },
            fx.chapter_repo.clone(),
        );

        assert!(queue.enqueue(Uuid::new_v4()));
        assert!(!queue.enqueue(Uuid::new_v4()));
    }
}
