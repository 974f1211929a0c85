use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tsview",
    version,
    about = "Windowed statistics and downsampled views of large x,y time series",
    long_about = "Ingest a two-column x,y text file, index it once, and query any window for\n\
                  min/max/average/variance or a fixed-width band+line projection.\n\
                  Malformed lines are skipped silently."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show length, block layout and whole-series statistics
    Info(InfoArgs),
    /// Exact statistics over an index range
    Stats(StatsArgs),
    /// Downsampled projection and statistics for one window
    View(ViewArgs),
    /// Advance a window on a timer, printing one JSON line per frame
    Play(PlayArgs),
    /// Check that a data file exists and contains records
    Validate(ValidateArgs),
}

/// Input file and indexing options shared by every data command
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Input data file path (x,y per line)
    #[arg(long)]
    pub file: String,

    /// JSON file with a full view configuration; flags override it
    #[arg(long)]
    pub config: Option<String>,

    /// Points summarised per min/max block
    #[arg(long, env = "TSVIEW_BLOCK_SIZE")]
    pub block_size: Option<usize>,

    /// Bytes read per chunk while ingesting
    #[arg(long, env = "TSVIEW_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,
}

/// Window placement and render resolution
#[derive(Args, Clone)]
pub struct WindowArgs {
    /// First index of the window (clamped into the series)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Number of points in the window (clamped to the series end)
    #[arg(long, allow_negative_numbers = true)]
    pub size: Option<i64>,

    /// Output width in points
    #[arg(long, env = "TSVIEW_WIDTH")]
    pub width: Option<usize>,
}

/// JSON output options
#[derive(Args, Clone)]
pub struct OutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First index (inclusive)
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Last index (inclusive); defaults to the last point
    #[arg(long)]
    pub end: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Only print the window statistics, not the projection
    #[arg(long, default_value_t = false)]
    pub stats_only: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Index advance per tick
    #[arg(long)]
    pub step: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after printing this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Include the projection in every frame
    #[arg(long, default_value_t = false)]
    pub with_projection: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input data file path
    #[arg(long)]
    pub file: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
