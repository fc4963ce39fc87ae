use clap::Parser;
use flightseg::segmentation::classifier::Position;
use flightseg::{label_track, read_track, write_labeled, AnalysisConfig};
use std::error::Error;
use std::path::PathBuf;
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
    /// Normalized flight track CSV to label
    #[arg()]
    infile: PathBuf,

    /// Output labeled CSV path
    #[arg()]
    outfile: PathBuf,

    /// Past window size in samples
    #[arg(long, default_value_t = 30)]
    past_window: usize,

    /// Future window size in samples
    #[arg(long, default_value_t = 30)]
    future_window: usize,

    /// Mean deviation angle threshold in degrees
    #[arg(long, default_value_t = 20.0)]
    angle_threshold: f64,

    /// Correlation coefficient threshold
    #[arg(long, default_value_t = 0.9)]
    r_value_threshold: f64,
}

fn bin_main() -> BinResult<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let points = read_track(&args.infile)?;
    if let Some(summary) = flightseg::track::summarize(&points) {
        info!(
            samples = summary.samples,
            duration_s = summary.duration_s,
            sampling_interval_s = summary.sampling_interval_s,
            "track loaded"
        );
    }

    let config = AnalysisConfig {
        past_window_size: args.past_window,
        future_window_size: args.future_window,
        angle_threshold: args.angle_threshold,
        r_value_threshold: args.r_value_threshold,
    };

    // Label the track!
    let labeled = label_track(&points, &config)?;

    let straight = labeled
        .iter()
        .filter(|row| row.position() == Position::Straight)
        .count();
    info!(
        labeled = labeled.len(),
        straight,
        curved = labeled.len() - straight,
        "track labeled"
    );

    write_labeled(&labeled, &args.outfile)?;
    Ok(())
}
