// コア層 - 型定義とエラー型

pub mod error;
pub mod types;

pub use error::{PipelineError, PipelineResult};
pub use types::{Matrix, MatrixPair, PipelineSummary};
