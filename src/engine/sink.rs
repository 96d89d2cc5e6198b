// Sink - 結果出力ステージ

use crate::queue::BlockingQueue;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Sink: 結果を1件ずつ取り出して出力する
///
/// 終了は結果キューがCLOSEDに達すること（全Consumerの登録解除と
/// 排出完了）だけで駆動される。結果キューはトークンを持たないため、
/// キャンセル後に生産された結果も必ず出力される。
pub fn spawn_sink<R, E>(mut emit: E, results: BlockingQueue<R>) -> JoinHandle<usize>
where
    R: Send + 'static,
    E: FnMut(R) + Send + 'static,
{
    thread::spawn(move || {
        let mut emitted = 0usize;
        while results.process(|result| emit(result)) {
            emitted += 1;
        }
        debug!(emitted, "sink finished");
        emitted
    })
}
