// エンジン層 - パイプラインステージとオーケストレーション

pub mod consumer;
pub mod pipeline;
pub mod producer;
pub mod sink;

pub use consumer::spawn_consumer;
pub use pipeline::{Pipeline, PipelineConfig};
pub use producer::spawn_producer;
pub use sink::spawn_sink;
