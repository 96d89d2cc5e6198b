// matrix_pipeline - 生産者・消費者パイプライン
// 生産者ライフネスカウンタ付きブロッキングキューを中核とした
// Producer → タスクキュー → Consumer → 結果キュー → Sink の一方向パイプライン

pub mod cancel;
pub mod cli;
pub mod core;
pub mod engine;
pub mod queue;

// 公開API
pub use crate::cancel::CancellationToken;
pub use crate::core::{Matrix, MatrixPair, PipelineError, PipelineResult, PipelineSummary};
pub use crate::engine::{Pipeline, PipelineConfig};
pub use crate::queue::BlockingQueue;
