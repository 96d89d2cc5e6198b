// Pipeline - オーケストレータ
// 2つのキューを所有し、各ステージのスレッドを起動・合流させる

use crate::cancel::CancellationToken;
use crate::core::{PipelineError, PipelineResult, PipelineSummary};
use crate::engine::{consumer::spawn_consumer, producer::spawn_producer, sink::spawn_sink};
use crate::queue::BlockingQueue;
use std::time::Instant;
use tracing::info;

/// パイプラインのスレッド構成
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Producerスレッド数
    pub producer_count: usize,
    /// Consumerスレッド数
    pub consumer_count: usize,
    /// Producer1つあたりのアイテム数（0 = キャンセルまで無制限）
    pub items_per_producer: usize,
}

/// Producer → タスクキュー → Consumer → 結果キュー → Sink の
/// 一方向パイプライン
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// 新しいパイプラインを作成
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// 設定を取得
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// パイプラインを実行して全ステージの終了を待つ
    ///
    /// `generate` はProducerごと、`transform` はConsumerごとに
    /// クローンされる。`emit` は単一のSinkスレッドが所有する。
    /// タスクキューはProducer数、結果キューはConsumer数を
    /// 生産者ライフネスカウンタの初期値として構築される。
    pub fn run<T, R, G, F, E>(
        &self,
        generate: G,
        transform: F,
        emit: E,
        token: &CancellationToken,
    ) -> PipelineResult<PipelineSummary>
    where
        T: Send + 'static,
        R: Send + 'static,
        G: FnMut() -> T + Clone + Send + 'static,
        F: FnMut(T) -> R + Clone + Send + 'static,
        E: FnMut(R) + Send + 'static,
    {
        let started = Instant::now();

        // タスクキューのみトークンと連動させる。結果キューは
        // 真のクローズまで排出を続けるため、あえて連動させない。
        let tasks = BlockingQueue::with_cancellation(self.config.producer_count, token);
        let results = BlockingQueue::new(self.config.consumer_count);

        let producers: Vec<_> = (0..self.config.producer_count)
            .map(|_| {
                spawn_producer(
                    generate.clone(),
                    self.config.items_per_producer,
                    tasks.clone(),
                    token.clone(),
                )
            })
            .collect();

        let consumers: Vec<_> = (0..self.config.consumer_count)
            .map(|_| spawn_consumer(transform.clone(), tasks.clone(), results.clone()))
            .collect();

        let sink = spawn_sink(emit, results.clone());

        // join順（Producer → Consumer → Sink）は後始末の順序であって
        // 同期機構ではない: 各ステージの終了はキューの状態遷移だけで
        // 駆動される
        let mut failed_stage: Option<&'static str> = None;

        let mut produced = 0usize;
        for handle in producers {
            match handle.join() {
                Ok(count) => produced += count,
                Err(_) => failed_stage = Some("producer"),
            }
        }
        if failed_stage.is_some() {
            // パニックしたスレッドはremove_producerを呼べていない
            // 可能性があるため、下流が永久に待たないよう強制クローズ
            tasks.remove_all_producers();
        }

        let mut consumed = 0usize;
        let mut consumer_panicked = false;
        for handle in consumers {
            match handle.join() {
                Ok(count) => consumed += count,
                Err(_) => consumer_panicked = true,
            }
        }
        if consumer_panicked {
            results.remove_all_producers();
            failed_stage.get_or_insert("consumer");
        }

        let emitted = match sink.join() {
            Ok(count) => count,
            Err(_) => {
                failed_stage.get_or_insert("sink");
                0
            }
        };

        if let Some(stage) = failed_stage {
            return Err(PipelineError::worker_panicked(stage));
        }

        let elapsed = started.elapsed();
        info!(produced, consumed, emitted, ?elapsed, "pipeline finished");

        Ok(PipelineSummary {
            produced,
            consumed,
            emitted,
            elapsed,
        })
    }
}
