use clap::Parser;
use flightseg::segmentation::optimizer::Progress;
use flightseg::{
    best, par_search, preferred, read_track, search, write_candidates, AnalysisConfig,
    OptimizerConfig,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

fn main() {
    if let Err(e) = bin_main() {
        eprintln!("error: {e}");
        if let Some(e) = e.source() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Normalized flight track CSV to optimize against
    #[arg()]
    infile: PathBuf,

    /// Output candidate ranking CSV path
    #[arg()]
    outfile: PathBuf,

    /// Exclusive upper bound of the window-size grid
    #[arg(long, default_value_t = 100)]
    limit: usize,

    /// Grid step in samples
    #[arg(long, default_value_t = 10)]
    step: usize,

    /// Weight of the mean r-value in the score
    #[arg(long, default_value_t = 0.6)]
    r_value_weight: f64,

    /// Weight of the mean p-value in the score
    #[arg(long, default_value_t = 0.3)]
    p_value_weight: f64,

    /// Weight of the mean standard error in the score
    #[arg(long, default_value_t = 0.1)]
    std_error_weight: f64,

    /// Abort the search after this many seconds, keeping partial results
    #[arg(long)]
    timeout_s: Option<u64>,

    /// Test configurations in parallel (disables progress estimation)
    #[arg(long)]
    parallel: bool,
}

fn bin_main() -> BinResult<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let points = read_track(&args.infile)?;
    let analysis = AnalysisConfig::default();
    let optimizer = OptimizerConfig {
        r_value_weight: args.r_value_weight,
        p_value_weight: args.p_value_weight,
        std_error_weight: args.std_error_weight,
        limit: args.limit,
        step: args.step,
        deadline: args
            .timeout_s
            .map(|s| Instant::now() + Duration::from_secs(s)),
    };

    // Test the configurations!
    let candidates = if args.parallel {
        par_search(&points, &analysis, &optimizer)
    } else {
        let mut report = |progress: Progress| {
            info!(
                completed = progress.completed,
                total = progress.total,
                estimated_remaining_s = progress.estimated_remaining.as_secs(),
                "configuration tested"
            );
        };
        search(&points, &analysis, &optimizer, Some(&mut report))
    };

    for candidate in best(&candidates, 5) {
        info!(
            past = candidate.past_window_size,
            future = candidate.future_window_size,
            score = candidate.score,
            data_loss = candidate.data_loss,
            "top candidate"
        );
    }
    if let Some(index) = preferred(&candidates) {
        let candidate = &candidates[index];
        info!(
            past = candidate.past_window_size,
            future = candidate.future_window_size,
            "preferred score/loss tradeoff"
        );
    }

    write_candidates(&candidates, &args.outfile)?;
    Ok(())
}
