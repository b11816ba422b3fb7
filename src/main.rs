use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use readalong::{HighlightConfig, Highlighter, Mode, PlaybackClock, Rendered, SourceKind, TimingEntry};

/// Read-along highlighting from the command line
#[derive(Debug, Parser)]
#[command(name = "readalong")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level, used when RUST_LOG is not set
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct PlaybackArgs {
    /// Audio duration in seconds
    #[arg(short, long)]
    duration: f64,

    /// Playback position in seconds
    #[arg(short, long)]
    time: f64,

    /// JSON file with provider word timing: [{"text", "start", "end"}, ...]
    #[arg(long)]
    timing: Option<PathBuf>,

    /// Treat the clock as paused instead of playing
    #[arg(long)]
    paused: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the units of a text block as JSON
    Segment {
        /// Input file
        input: PathBuf,

        /// Input is an HTML fragment
        #[arg(long)]
        html: bool,
    },

    /// Print the unit being spoken at a point in playback
    Project {
        /// Input file
        input: PathBuf,

        /// Input is an HTML fragment
        #[arg(long)]
        html: bool,

        #[command(flatten)]
        playback: PlaybackArgs,
    },

    /// Print the text block with the active unit marked
    Annotate {
        /// Input file
        input: PathBuf,

        /// Input is an HTML fragment
        #[arg(long)]
        html: bool,

        #[command(flatten)]
        playback: PlaybackArgs,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Projection<'a> {
    mode: &'static str,
    active_index: Option<usize>,
    text: Option<&'a str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match &cli.config {
        Some(path) => HighlightConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HighlightConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Segment { input, html } => {
            let highlighter = load_highlighter(&input, html, None, &config)?;
            println!("{}", serde_json::to_string_pretty(&highlighter.units().tokens)?);
        }
        Commands::Project { input, html, playback } => {
            let highlighter = load_highlighter(&input, html, playback.timing.as_deref(), &config)?;
            let active = highlighter.active_index(&clock(&playback));
            let projection = Projection {
                mode: match highlighter.mode() {
                    Mode::Estimated => "estimated",
                    Mode::Exact => "exact",
                },
                active_index: active,
                text: active
                    .and_then(|i| highlighter.units().tokens.get(i))
                    .map(|t| t.text.as_str()),
            };
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
        Commands::Annotate { input, html, playback } => {
            let mut highlighter = load_highlighter(&input, html, playback.timing.as_deref(), &config)?;
            match highlighter.tick(&clock(&playback)).rendered {
                Rendered::Markup(markup) => println!("{}", markup),
                Rendered::Tokens(tokens) => println!("{}", serde_json::to_string_pretty(&tokens)?),
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr));
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_highlighter(
    input: &Path,
    html: bool,
    timing: Option<&Path>,
    config: &HighlightConfig,
) -> Result<Highlighter> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Error reading file '{}'", input.display()))?;
    let kind = if html { SourceKind::Html } else { SourceKind::Plain };
    let highlighter = Highlighter::new(source, kind, config);

    match timing {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Error reading timing file '{}'", path.display()))?;
            let entries: Vec<TimingEntry> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid timing JSON in '{}'", path.display()))?;
            Ok(highlighter.with_timing(entries))
        }
        None => Ok(highlighter),
    }
}

fn clock(args: &PlaybackArgs) -> PlaybackClock {
    if args.paused {
        PlaybackClock::paused(args.time, args.duration)
    } else {
        PlaybackClock::playing(args.time, args.duration)
    }
}
