// Consumer - 変換ステージ（タスクキュー → 結果キュー）

use crate::queue::BlockingQueue;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Consumer: タスクを1件ずつ変換して結果キューへ配信
///
/// キャンセルの監視はタスクキュー側（`with_cancellation` 構築）が担う:
/// 要素が残っている間は必ず排出し、空になってからキャンセルを観測して
/// `process` がfalseを返す。したがってキャンセル後も投入済みタスクは
/// 失われない。各Consumerは結果キューの生産者として登録されており、
/// ループ脱出時に `remove_producer` をちょうど1回呼ぶ。
pub fn spawn_consumer<T, R, F>(
    mut transform: F,
    tasks: BlockingQueue<T>,
    results: BlockingQueue<R>,
) -> JoinHandle<usize>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(T) -> R + Send + 'static,
{
    thread::spawn(move || {
        let mut consumed = 0usize;
        while tasks.process(|task| results.push(transform(task))) {
            consumed += 1;
        }
        results.remove_producer();
        debug!(consumed, "consumer finished");
        consumed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_transforms_all_tasks() {
        let tasks = BlockingQueue::new(1);
        let results = BlockingQueue::new(1);

        for i in 1..=4 {
            tasks.push(i);
        }
        tasks.remove_producer();

        let handle = spawn_consumer(|task: i32| task * 10, tasks, results.clone());

        assert_eq!(handle.join().unwrap(), 4);

        // Consumer終了後、結果キューもクローズへ向かう
        let mut received = Vec::new();
        while results.process(|item| received.push(item)) {}
        assert_eq!(received, vec![10, 20, 30, 40]);
        assert!(results.is_closed());
    }

    #[test]
    fn test_consumer_exits_on_empty_closed_queue() {
        let tasks: BlockingQueue<i32> = BlockingQueue::new(0);
        let results: BlockingQueue<i32> = BlockingQueue::new(1);

        let handle = spawn_consumer(|task| task, tasks, results.clone());

        // タスクが1件もなくても正常終了し、結果キューから登録解除する
        assert_eq!(handle.join().unwrap(), 0);
        assert!(results.is_closed());
    }

    #[test]
    fn test_multiple_consumers_share_one_task_queue() {
        let tasks = BlockingQueue::new(1);
        let results = BlockingQueue::new(3);

        for i in 0..30 {
            tasks.push(i);
        }
        tasks.remove_producer();

        let handles: Vec<_> = (0..3)
            .map(|_| spawn_consumer(|task: i32| task, tasks.clone(), results.clone()))
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        // 各タスクはちょうど1つのConsumerに配送される
        assert_eq!(total, 30);

        let mut received = Vec::new();
        while results.process(|item| received.push(item)) {}
        received.sort_unstable();
        assert_eq!(received, (0..30).collect::<Vec<_>>());
    }
}
