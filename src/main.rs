use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use matrix_pipeline::{
    cancel::CancellationToken,
    cli::Cli,
    core::{Matrix, MatrixPair, PipelineError},
    engine::{Pipeline, PipelineConfig},
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ（stdoutはRESULT出力専用）
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if cli.matrix_size == 0 {
        return Err(PipelineError::configuration("行列サイズは1以上である必要があります").into());
    }

    // Ctrl-Cでトークンをキャンセル（待機中の消費者も即座に起床する）
    let token = CancellationToken::new();
    let interrupt = token.clone();
    ctrlc::set_handler(move || interrupt.cancel())?;

    println!("🚀 行列積パイプライン - 並列処理版");
    println!("⚙️  設定:");
    println!("   - Producerスレッド数: {}", cli.producers);
    println!("   - Consumerスレッド数: {}", cli.consumers);
    println!(
        "   - Producerあたりタスク数: {}",
        if cli.tasks == 0 {
            "無制限（Ctrl-Cで停止）".to_string()
        } else {
            cli.tasks.to_string()
        }
    );
    println!("   - 行列サイズ: {0}x{0}", cli.matrix_size);

    let pipeline = Pipeline::new(PipelineConfig {
        producer_count: cli.producers,
        consumer_count: cli.consumers,
        items_per_producer: cli.tasks,
    });

    let size = cli.matrix_size;
    match pipeline.run(
        move || MatrixPair::generate(size),
        |pair: MatrixPair| pair.product(),
        |product: Matrix| println!("RESULT\n{product}"),
        &token,
    ) {
        Ok(summary) => {
            if token.is_cancelled() {
                println!("⚠️  割り込みを検出しました（投入済みタスクは出力済み）");
            }
            println!("✅ 処理完了!");
            println!("📊 処理結果:");
            println!("   - 生産タスク数: {}", summary.produced);
            println!("   - 変換タスク数: {}", summary.consumed);
            println!("   - 出力結果数: {}", summary.emitted);
            println!("   - 総処理時間: {:.2}秒", summary.elapsed.as_secs_f64());
        }
        Err(error) => {
            eprintln!("❌ エラー: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}
