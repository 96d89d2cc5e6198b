// CancellationToken - 協調的キャンセル用トークン
// グローバル変数ではなくインスタンス単位でパイプラインに渡す設計

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// キャンセル通知時に呼び出されるフック
type Waker = Box<dyn Fn() + Send + Sync>;

/// 協調的キャンセルトークン
///
/// クローン可能なハンドルで、全クローンが同じキャンセル状態を共有する。
/// `cancel()` は登録済みの全ウェイカーを実行するため、
/// 条件変数で待機中のスレッドも即座に起床できる。
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Default)]
struct TokenInner {
    cancelled: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}

impl CancellationToken {
    /// 新しい（未キャンセルの）トークンを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセル済みかどうかをポーリング
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// キャンセルを要求（冪等）
    ///
    /// フラグを立てた後、登録済みウェイカーを順に実行する。
    /// 2回目以降の呼び出しは何もしない。
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let wakers = self.inner.wakers.lock();
        for waker in wakers.iter() {
            waker();
        }
    }

    /// キャンセル時に実行されるフックを登録
    ///
    /// すでにキャンセル済みの場合は即座に実行する。
    /// 登録とキャンセルの競合はウェイカーリストのロックで直列化される。
    pub fn on_cancel<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut wakers = self.inner.wakers.lock();
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(wakers);
            waker();
            return;
        }
        wakers.push(Box::new(waker));
    }
}
