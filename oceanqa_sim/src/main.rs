//! OceanQA dataset CLI
//!
//! Build a balanced video question-answering dataset, or summarize one.

use clap::{Args, Parser, Subcommand};
use oceanqa_sim::{
    analyse, build_json, read_dataset, render_dataset, AnalysisOptions, BuildConfig, ConfigFile,
    SimError,
};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// OceanQA dataset builder
#[derive(Parser, Debug)]
#[command(name = "oceanqa")]
#[command(about = "Build and analyse OceanQA video question-answering datasets", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate videos, generate questions and write the dataset
    Build(BuildArgs),

    /// Print distribution summaries of a written dataset
    Analyse(AnalyseArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Output directory
    out_dir: PathBuf,

    /// Number of videos to simulate
    num_videos: usize,

    /// Only write video.json files
    #[arg(short, long, conflicts_with = "frames_only")]
    json_only: bool,

    /// Only render frames for an existing dataset
    #[arg(short, long)]
    frames_only: bool,

    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Total question sampling attempts (default: 4 per video)
    #[arg(long)]
    attempts: Option<usize>,

    /// Drop videos with fewer questions than this
    #[arg(long)]
    min_questions: Option<usize>,

    /// JSON file with `scene` and `qa` settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replace an existing output directory
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Dataset root or a single split directory
    data_dir: PathBuf,

    /// Event occurrences
    #[arg(short, long)]
    events: bool,

    /// Rock and octopus colours
    #[arg(short, long)]
    colours: bool,

    /// Octopus rotations
    #[arg(short, long)]
    rotations: bool,

    /// Fish eaten per video
    #[arg(short, long)]
    fish: bool,

    /// Question types
    #[arg(short, long)]
    questions: bool,
}

fn build(args: BuildArgs) -> Result<(), SimError> {
    if !args.frames_only {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let mut config = BuildConfig {
            seed: args.seed,
            num_videos: args.num_videos,
            force: args.force,
            scene: file.scene,
            qa: file.qa,
            ..BuildConfig::default()
        };
        if args.attempts.is_some() {
            config.qa.attempts = args.attempts;
        }
        if let Some(min) = args.min_questions {
            config.qa.min_questions = min;
        }

        let summary = build_json(&args.out_dir, &config)?;
        info!(
            "✓ {} videos written (seed={}, {:.1}% of attempts succeeded)",
            summary.report.kept,
            summary.seed,
            summary.report.success_rate() * 100.0
        );
    }

    if !args.json_only {
        render_dataset(&args.out_dir)?;
    }
    Ok(())
}

fn analyse_dir(args: AnalyseArgs) -> Result<(), SimError> {
    let mut options = AnalysisOptions {
        events: args.events,
        colours: args.colours,
        rotations: args.rotations,
        fish: args.fish,
        questions: args.questions,
    };
    if !options.any() {
        options = AnalysisOptions::all();
    }

    let videos = read_dataset(&args.data_dir)?;
    for histogram in analyse(&videos, options) {
        histogram.log();
        info!("");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    info!("OceanQA dataset builder v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Build(args) => build(args),
        Command::Analyse(args) => analyse_dir(args),
    };

    if let Err(e) = result {
        error!("✗ {}", e);
        std::process::exit(1);
    }
}
