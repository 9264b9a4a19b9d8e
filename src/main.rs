use anyhow::Result;
use clap::Parser;
use rhythm_metrics::{AnalysisConfig, BatchRunner, ExportFormat, PlotFormat, StubProvider};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rhythm-metrics")]
#[command(
    about = "Objective rhythmic-stability and timbral-range analysis for audio files",
    long_about = None
)]
struct Args {
    /// Single audio file to analyze (mp3, flac, wav)
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Directory of audio files to analyze as a batch
    #[arg(short = 'b', long)]
    batch: Option<PathBuf>,

    /// Generate a diagnostic plot per file
    #[arg(long)]
    plot: bool,

    /// Directory for images and reports
    #[arg(short = 'o', long, default_value = "./reports")]
    outdir: PathBuf,

    /// Plot image format
    #[arg(long, value_enum, default_value = "png")]
    format: PlotFormat,

    /// Export the aggregated results to CSV or JSON
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Tempo of the synthetic stub feature grid, BPM
    #[arg(long, default_value = "120.0")]
    stub_bpm: f64,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let input = args
        .file
        .as_deref()
        .or(args.batch.as_deref())
        .ok_or(rhythm_metrics::MetricsError::EmptyInput)?;

    let config = AnalysisConfig::new();

    // The stub provider stands in until a real DSP backend is plugged in
    // behind the FeatureProvider trait.
    let provider = StubProvider::new()
        .with_grid_bpm(args.stub_bpm)
        .with_hop_length(config.hop_length);

    let mut runner = BatchRunner::new(config, provider, args.outdir.clone());
    if args.plot {
        runner = runner.with_plots(args.format);
    }
    if let Some(format) = args.export {
        runner = runner.with_export(format);
    }

    let batch = runner.run(input)?;

    println!("\n=== ANALYSIS COMPLETE ===");
    for record in batch.iter() {
        println!("{}", serde_json::to_string(record)?);
    }

    Ok(())
}
