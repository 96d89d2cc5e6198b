// BlockingQueue - 生産者数カウンタ付きスレッドセーフFIFOキュー
// 複数生産者・複数消費者の協調とクローズプロトコルを担う中核部品

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::cancel::CancellationToken;

/// 生産者ライフネスカウンタ付きのスレッドセーフFIFOキュー
///
/// クローンはハンドルの複製で、全クローンが同じキューを共有する。
/// ライフサイクルは OPEN（カウンタ > 0）→ DRAINING（カウンタ == 0、
/// 要素あり）→ CLOSED（カウンタ == 0、空）の一方向で、CLOSEDは終端状態。
pub struct BlockingQueue<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    available: Condvar,
    /// `with_cancellation` で構築された場合のみ設定される。
    /// キャンセル時、空のキューで待機中のスレッドを起床させて
    /// falseを返させる（要素が残っている間は通常どおり排出する）。
    cancel: Option<CancellationToken>,
}

struct State<T> {
    items: VecDeque<T>,
    producers: usize,
}

impl<T> Clone for BlockingQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> BlockingQueue<T> {
    /// 生産者数 `producer_count` のキューを作成
    ///
    /// `producer_count == 0` の場合、キューは構築時点で空かつ
    /// クローズ済みであり、`process` は即座に `false` を返す。
    pub fn new(producer_count: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    items: VecDeque::new(),
                    producers: producer_count,
                }),
                available: Condvar::new(),
                cancel: None,
            }),
        }
    }

    /// キャンセルトークンと連動するキューを作成
    ///
    /// トークンのキャンセルはこのキューの条件変数にも通知されるため、
    /// 空のキューで待機中の消費者はpushや生産者の登録解除を待たずに
    /// 即座に起床する。
    pub fn with_cancellation(producer_count: usize, token: &CancellationToken) -> Self
    where
        T: Send + 'static,
    {
        let queue = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    items: VecDeque::new(),
                    producers: producer_count,
                }),
                available: Condvar::new(),
                cancel: Some(token.clone()),
            }),
        };

        // キューより長生きしないようWeakで登録する
        let shared: Weak<Shared<T>> = Arc::downgrade(&queue.shared);
        token.on_cancel(move || {
            if let Some(shared) = shared.upgrade() {
                // フラグ確認とwaitの間の取りこぼしを防ぐため、
                // ロックを一度取得してから全員を起床させる
                let _state = shared.state.lock();
                shared.available.notify_all();
            }
        });

        queue
    }

    /// 要素を末尾に追加し、待機中の消費者を1つ起床させる
    ///
    /// キューは容量無制限のため、ブロックも失敗もしない。
    pub fn push(&self, item: T) {
        let mut state = self.shared.state.lock();
        state.items.push_back(item);
        drop(state);
        self.shared.available.notify_one();
    }

    /// 先頭要素を1つ取り出して `handler` に渡す
    ///
    /// 要素があれば取り出して `true` を返す。空かつCLOSEDなら
    /// ブロックせず `false` を返す。空かつキャンセル済み
    /// （`with_cancellation` 構築時のみ）も `false` を返す。
    /// それ以外は要素の到着か状態変化まで待機して再評価する。
    ///
    /// 取り出しはロック下で行われるため、複数スレッドが同時に
    /// `process` しても各要素はちょうど1回だけ配送される。
    /// `handler` 自体はロック外で実行される。
    pub fn process<F>(&self, handler: F) -> bool
    where
        F: FnOnce(T),
    {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                handler(item);
                return true;
            }
            if state.producers == 0 {
                return false;
            }
            if let Some(token) = &self.shared.cancel {
                if token.is_cancelled() {
                    return false;
                }
            }
            self.shared.available.wait(&mut state);
        }
    }

    /// 生産者を1つ登録解除する
    ///
    /// カウンタは0で飽和する（過剰な呼び出しは何もしない）。
    /// カウンタが0に達したら待機中の全消費者を起床させ、
    /// DRAINING/CLOSEDへの遷移を観測させる。
    pub fn remove_producer(&self) {
        let mut state = self.shared.state.lock();
        if state.producers == 0 {
            return;
        }
        state.producers -= 1;
        if state.producers == 0 {
            debug!(remaining = state.items.len(), "last producer removed");
            drop(state);
            self.shared.available.notify_all();
        }
    }

    /// 全生産者を強制的に登録解除する
    ///
    /// 通常の1減算プロトコルを迂回する即時シャットダウン用。
    /// 登録解除を呼べずに終了したスレッド（パニック等）の後始末に使う。
    pub fn remove_all_producers(&self) {
        let mut state = self.shared.state.lock();
        state.producers = 0;
        drop(state);
        self.shared.available.notify_all();
    }

    /// 現在の要素数
    pub fn len(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    /// キューが空かどうか
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().items.is_empty()
    }

    /// CLOSED（生産者なし・空）に達しているかどうか
    pub fn is_closed(&self) -> bool {
        let state = self.shared.state.lock();
        state.producers == 0 && state.items.is_empty()
    }
}
