// Producer - 作業アイテム生成ステージ

use crate::cancel::CancellationToken;
use crate::queue::BlockingQueue;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Producer: 作業アイテムを生成してタスクキューへ配信
///
/// `item_count == 0` は無制限（キャンセルまで生成し続ける）。
/// ループ脱出時は理由を問わず `remove_producer` をちょうど1回呼ぶ。
/// 生成したアイテム数をJoinHandle経由で返す。
pub fn spawn_producer<T, G>(
    mut generate: G,
    item_count: usize,
    tasks: BlockingQueue<T>,
    token: CancellationToken,
) -> JoinHandle<usize>
where
    T: Send + 'static,
    G: FnMut() -> T + Send + 'static,
{
    thread::spawn(move || {
        let unbounded = item_count == 0;
        let mut remaining = item_count;
        let mut produced = 0usize;

        // pushはブロックしないため、トークンは毎周回で必ず観測される
        while !token.is_cancelled() && (unbounded || remaining > 0) {
            tasks.push(generate());
            produced += 1;
            if !unbounded {
                remaining -= 1;
            }
        }

        tasks.remove_producer();
        debug!(produced, "producer finished");
        produced
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_pushes_exact_count() {
        let tasks = BlockingQueue::new(1);
        let token = CancellationToken::new();

        let mut next = 0u32;
        let handle = spawn_producer(
            move || {
                next += 1;
                next
            },
            5,
            tasks.clone(),
            token,
        );

        let produced = handle.join().unwrap();
        assert_eq!(produced, 5);

        // 登録解除済みなので、5件取り出した後はfalse
        let mut received = Vec::new();
        while tasks.process(|item| received.push(item)) {}
        assert_eq!(received, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cancelled_producer_still_deregisters() {
        let tasks: BlockingQueue<u32> = BlockingQueue::new(1);
        let token = CancellationToken::new();
        token.cancel();

        let handle = spawn_producer(|| 1, 100, tasks.clone(), token);

        // 1件も生成しないが、登録解除は必ず行われる
        assert_eq!(handle.join().unwrap(), 0);
        assert!(tasks.is_closed());
    }

    #[test]
    fn test_unbounded_producer_stops_on_cancel() {
        let tasks = BlockingQueue::new(1);
        let token = CancellationToken::new();

        // 生成関数の中からキャンセルして決定的に停止させる
        let cancel = token.clone();
        let mut count = 0u32;
        let handle = spawn_producer(
            move || {
                count += 1;
                if count == 3 {
                    cancel.cancel();
                }
                count
            },
            0,
            tasks.clone(),
            token,
        );

        assert_eq!(handle.join().unwrap(), 3);
        assert_eq!(tasks.len(), 3);
    }
}
