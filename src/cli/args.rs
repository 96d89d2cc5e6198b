use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "matrix_pipeline")]
#[command(about = "A producer-consumer pipeline multiplying randomly generated matrices")]
#[command(version)]
pub struct Cli {
    /// Number of producer threads generating matrix pairs
    #[arg(short, long, default_value_t = 1)]
    pub producers: usize,

    /// Number of consumer threads multiplying matrices
    #[arg(short, long, default_value_t = num_cpus::get().max(1))]
    pub consumers: usize,

    /// Tasks generated per producer (0 = run until interrupted)
    #[arg(short, long, default_value_t = 0)]
    pub tasks: usize,

    /// Dimension of the generated square matrices
    #[arg(short = 's', long, default_value_t = 3)]
    pub matrix_size: usize,
}
