use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use framepick_core::{
    Ffmpeg, SelectionConfig, assess_frame, format_selection_readable, format_timestamp,
    get_output_dir, materialize_picks, plan_candidates, select_best_frames,
};

const DEFAULT_LOG_FILTER: &str = "framepick=warn,framepick_core=warn";

#[derive(Parser)]
#[command(name = "framepick")]
#[command(about = "Pick the best thumbnail frames of a video using ffmpeg signal statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score candidate frames of a video and keep the best, well-spaced ones
    Select(SelectArgs),

    /// Print the candidate timestamps planned for a video duration
    Plan {
        /// Video duration in seconds
        duration: f64,

        /// Upper bound on the number of candidates
        #[arg(long)]
        max_candidates: Option<usize>,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Print the quality score of already extracted images
    Score {
        /// Image files to score
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        tool: ToolArgs,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// Video file
    video: PathBuf,

    /// Directory for the picked frames. Defaults to a per-video cache directory.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Only report the picks, do not write the frames
    #[arg(long)]
    no_extract: bool,

    /// Print the selection as JSON
    #[arg(long)]
    json: bool,

    /// Upper bound on the number of candidates to score
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Number of frames to pick
    #[arg(short, long)]
    picks: Option<usize>,

    /// Width candidates are downscaled to before scoring (0 keeps the source size)
    #[arg(long)]
    scoring_width: Option<u32>,

    #[command(flatten)]
    tool: ToolArgs,
}

#[derive(Args)]
struct ToolArgs {
    /// Path to the ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long)]
    ffprobe: Option<PathBuf>,

    /// Seconds before a single ffmpeg/ffprobe invocation is killed
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl ToolArgs {
    fn apply(&self, config: &mut SelectionConfig) {
        if let Some(ffmpeg) = &self.ffmpeg {
            config.ffmpeg_path = ffmpeg.clone();
        }
        if let Some(ffprobe) = &self.ffprobe {
            config.ffprobe_path = ffprobe.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.tool_timeout = Duration::from_secs(secs);
        }
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_select(args: SelectArgs) -> Result<()> {
    if !args.video.is_file() {
        bail!("Video file not found: {}", args.video.display());
    }

    let mut config = SelectionConfig::from_env();
    args.tool.apply(&mut config);
    if let Some(max) = args.max_candidates {
        config.max_candidates = max;
    }
    if let Some(picks) = args.picks {
        config.pick_count = picks;
    }
    if let Some(width) = args.scoring_width {
        config.scoring_width = (width > 0).then_some(width);
    }

    if !args.json {
        println!(
            "\n{}  {}\n",
            style("framepick").cyan().bold(),
            style("Frame Selector").dim()
        );
    }

    let tool = Ffmpeg::from_config(&config);

    let started = Instant::now();
    let spinner = create_spinner("Scoring candidate frames...");
    let selection = match select_best_frames(&tool, &args.video, &config).await {
        Ok(selection) => selection,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "{} Picked {} frames from {} of video in {}",
        style("✓").green().bold(),
        selection.picks.len(),
        format_timestamp(selection.duration),
        style(format_duration(started.elapsed())).dim()
    ));

    let files = if args.no_extract || selection.picks.is_empty() {
        Vec::new()
    } else {
        let out_dir = args.out.unwrap_or_else(|| get_output_dir(&args.video));
        let spinner = create_spinner("Writing picked frames...");
        let files = match materialize_picks(&tool, &args.video, &selection.picks, &out_dir).await {
            Ok(files) => files,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
        spinner.finish_with_message(format!(
            "{} Frames written to {}",
            style("✓").green().bold(),
            style(out_dir.display()).cyan()
        ));
        files
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        println!("{}", style("─".repeat(60)).dim());
        print!("{}", format_selection_readable(&selection, &files));
    }

    Ok(())
}

fn run_plan(duration: f64, max_candidates: Option<usize>, json: bool) -> Result<()> {
    let max = max_candidates.unwrap_or(SelectionConfig::from_env().max_candidates);
    let timestamps = plan_candidates(duration, max)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timestamps)?);
        return Ok(());
    }

    for (i, t) in timestamps.iter().enumerate() {
        println!("{:>4}  {}  {:.3}", i + 1, format_timestamp(*t), t);
    }
    println!(
        "\n{} {} candidates",
        style("Planned:").dim(),
        style(timestamps.len()).cyan()
    );
    Ok(())
}

async fn run_score(images: Vec<PathBuf>, tool_args: ToolArgs) -> Result<()> {
    let mut config = SelectionConfig::from_env();
    tool_args.apply(&mut config);
    let tool = Ffmpeg::from_config(&config);

    for image in images {
        let quality = assess_frame(&tool, &image).await;
        println!(
            "{}: {} (exposure {:.3}, contrast {:.3}, sharpness {:.3})",
            image.display(),
            style(format!("{:.3}", quality.score())).cyan().bold(),
            quality.exposure,
            quality.contrast,
            quality.sharpness
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Select(args) => run_select(args).await,
        Command::Plan {
            duration,
            max_candidates,
            json,
        } => run_plan(duration, max_candidates, json),
        Command::Score { images, tool } => run_score(images, tool).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
