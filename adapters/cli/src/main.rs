#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a Jewel Sweep board and script.

mod settings;

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use jewel_sweep_core::MovePolicy;
use jewel_sweep_rendering::{render_ascii, render_header, FramePresentation};
use jewel_sweep_system_replay::{Replay, ReplayConfig, ReplayEngine};
use tracing::{debug, info};

/// Replays a movement script over a jewel board and prints the frames.
#[derive(Debug, Parser)]
#[command(name = "jewel-sweep", version)]
#[command(group(ArgGroup::new("selection").args(["frame", "all"])))]
struct Cli {
    /// Board description file.
    board: PathBuf,

    /// Action script file.
    script: PathBuf,

    /// TOML file holding replay settings.
    #[arg(long, value_name = "FILE", conflicts_with = "judge")]
    config: Option<PathBuf>,

    /// Start from the contest judge settings: strict moves, pattern of at most 500 offsets.
    #[arg(long)]
    judge: bool,

    /// Treatment of commands that walk off the board.
    #[arg(long, value_enum)]
    move_policy: Option<MovePolicyArg>,

    /// Largest accepted sensor pattern.
    #[arg(long, value_name = "N")]
    max_pattern_len: Option<usize>,

    /// Print only the frame at this age.
    #[arg(long, value_name = "N")]
    frame: Option<usize>,

    /// Print every frame.
    #[arg(long)]
    all: bool,

    /// Print a one-line summary after the frames.
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MovePolicyArg {
    Reject,
    Permit,
}

impl From<MovePolicyArg> for MovePolicy {
    fn from(value: MovePolicyArg) -> Self {
        match value {
            MovePolicyArg::Reject => Self::Reject,
            MovePolicyArg::Permit => Self::Permit,
        }
    }
}

/// Entry point for the Jewel Sweep command-line interface.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    debug!(
        move_policy = ?config.move_policy,
        max_pattern_len = ?config.max_pattern_len,
        "resolved replay config"
    );

    let board_text = read_input(&cli.board, "board")?;
    let script_text = read_input(&cli.script, "script")?;
    info!(
        board = %cli.board.display(),
        script = %cli.script.display(),
        board_bytes = board_text.len(),
        script_bytes = script_text.len(),
        "loaded replay inputs"
    );
    let board_label = cli.board.display().to_string();
    let script_label = cli.script.display().to_string();

    let replay = ReplayEngine::new(config)
        .replay_text(&board_label, &board_text, &script_label, &script_text)
        .context("replay failed")?;

    print!("{}", render_selection(&replay, &cli)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ReplayConfig> {
    let mut config = match &cli.config {
        Some(path) => settings::load(path)?,
        None if cli.judge => ReplayConfig::judge(),
        None => ReplayConfig::default(),
    };
    if let Some(policy) = cli.move_policy {
        config = config.with_move_policy(policy.into());
    }
    if let Some(limit) = cli.max_pattern_len {
        config = config.with_max_pattern_len(Some(limit));
    }
    Ok(config)
}

fn read_input(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file at {}", path.display()))
}

fn render_selection(replay: &Replay, cli: &Cli) -> Result<String> {
    let mut out = String::new();
    let frames: Vec<_> = if cli.all {
        replay.iter().collect()
    } else if let Some(age) = cli.frame {
        match replay.frame(age) {
            Some(frame) => vec![frame],
            None => bail!(
                "frame {age} does not exist; the replay has frames 0..={}",
                replay.len() - 1
            ),
        }
    } else if cli.summary {
        Vec::new()
    } else {
        vec![replay.last()]
    };

    for frame in frames {
        let presentation = FramePresentation::from_frame(frame);
        out.push_str(&render_header(&presentation));
        out.push('\n');
        out.push_str(&render_ascii(&presentation));
    }

    if cli.summary {
        let last = replay.last();
        let _ = writeln!(
            out,
            "frames: {}, jewels remaining: {}, cleared: {}",
            replay.len(),
            last.remaining_jewels().len(),
            last.is_cleared()
        );
    }
    Ok(out)
}
