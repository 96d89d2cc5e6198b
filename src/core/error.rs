// パイプライン用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
///
/// キュー操作自体は失敗しないため、エラーになり得るのは
/// 設定の検証とワーカースレッドの異常終了のみ。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("ワーカーエラー: {stage}ステージのスレッドがパニックしました")]
    WorkerPanicked { stage: &'static str },
}

impl PipelineError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// ワーカーパニックエラーの作成
    pub fn worker_panicked(stage: &'static str) -> Self {
        Self::WorkerPanicked { stage }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
