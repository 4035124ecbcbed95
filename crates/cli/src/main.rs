use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cutlist_core::model::{Rational, Resolution};
use cutlist_core::{
    OverlapPolicy, ParseOptions, SourceInfo, Strictness, Timeline, lift_v1_with, parse_v1,
    parse_with, serialize, serialize_pretty,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutlist", version, about = "Check, format and lift timeline documents")]
struct Cli {
    /// Ignore unknown v3 fields instead of rejecting them (v1 extras are always ignored)
    #[arg(long, global = true)]
    lax: bool,

    /// Reject items that overlap an earlier item on the same layer
    #[arg(long, global = true)]
    reject_overlap: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate a document, then print a summary
    Check { file: PathBuf },

    /// Print the canonical form of a document
    Fmt {
        file: PathBuf,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Convert a v1 cut list to a v3 timeline
    Lift {
        file: PathBuf,
        /// Source frame rate as p/q, e.g. 30000/1001
        #[arg(long)]
        timebase: Rational,
        #[arg(long)]
        width: u64,
        #[arg(long)]
        height: u64,
        #[arg(long, default_value_t = 48000)]
        samplerate: u64,
        #[arg(long, default_value_t = 1)]
        video_streams: u64,
        #[arg(long, default_value_t = 1)]
        audio_streams: u64,
        #[arg(long)]
        compact: bool,
    },
}

impl Cli {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            strictness: if self.lax {
                Strictness::Lax
            } else {
                Strictness::Strict
            },
            overlap: if self.reject_overlap {
                OverlapPolicy::Reject
            } else {
                OverlapPolicy::Permit
            },
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn summary(timeline: &Timeline) -> String {
    match timeline {
        Timeline::V1(t) => format!(
            "v1 {}: {} chunks, {} kept",
            t.source,
            t.chunks.len(),
            t.kept().count()
        ),
        Timeline::V3(t) => format!(
            "v3 {}x{} @ {}: {} video layers, {} audio layers, {} items, ends at {}",
            t.resolution.width,
            t.resolution.height,
            t.timebase,
            t.v.len(),
            t.a.len(),
            t.item_count(),
            t.end()
        ),
    }
}

fn emit(timeline: &Timeline, compact: bool) -> Result<()> {
    let mut bytes = if compact {
        serialize(timeline)?
    } else {
        serialize_pretty(timeline)?
    };
    bytes.push(b'\n');
    io::stdout().lock().write_all(&bytes)?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = cli.options();
    debug!(?opts, "options");

    match &cli.command {
        Command::Check { file } => {
            let timeline = parse_with(&read(file)?, &opts)?;
            writeln!(io::stdout().lock(), "{}", summary(&timeline))?;
        }
        Command::Fmt { file, compact } => {
            let timeline = parse_with(&read(file)?, &opts)?;
            emit(&timeline, *compact)?;
        }
        Command::Lift {
            file,
            timebase,
            width,
            height,
            samplerate,
            video_streams,
            audio_streams,
            compact,
        } => {
            let source = parse_v1(&read(file)?)?;
            let info = SourceInfo {
                timebase: *timebase,
                resolution: Resolution::new(*width, *height),
                samplerate: *samplerate,
                video_streams: *video_streams,
                audio_streams: *audio_streams,
            };
            let lifted = lift_v1_with(&source, &info, &opts)?;
            emit(&Timeline::V3(lifted), *compact)?;
        }
    }
    Ok(())
}
