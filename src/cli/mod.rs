// CLI層 - コマンドライン引数

pub mod args;

pub use args::Cli;
