//! Strictly Hanoi - Unified CLI
//!
//! Terminal game, headless solver and best-record maintenance.

#![warn(missing_docs)]

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use strictly_hanoi_app::strictly_hanoi::{DiskCount, SolutionOutcome};
use strictly_hanoi_app::{
    HanoiConfig, HighScoreRepository, OutputFormat, print_standings, run_solve, run_tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = HanoiConfig::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path {
        config = config.with_database_path(db_path);
    }

    match cli.command {
        Command::Play { disks, pace_ms } => {
            let config = apply_overrides(config, disks, pace_ms)?;
            init_file_logging(config.log_file())?;
            run_play(config).await
        }
        Command::Solve {
            disks,
            pace_ms,
            json,
        } => {
            init_stderr_logging();
            let config = apply_overrides(config, disks, pace_ms)?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            run_solve_command(config, format).await
        }
        Command::Scores => {
            init_stderr_logging();
            run_scores(config)
        }
        Command::ClearScores { disks } => {
            init_stderr_logging();
            run_clear_scores(config, disks)
        }
    }
}

/// Applies per-command flags on top of the loaded configuration.
fn apply_overrides(
    config: HanoiConfig,
    disks: Option<u8>,
    pace_ms: Option<u64>,
) -> Result<HanoiConfig> {
    let config = match disks {
        Some(n) => config.with_disk_count(DiskCount::new(n)?),
        None => config,
    };
    Ok(match pace_ms {
        Some(0) => bail!("--pace-ms must be positive"),
        Some(ms) => config.with_solution_pace_ms(ms),
        None => config,
    })
}

/// Logs to a file so the terminal UI keeps the screen.
fn init_file_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Logs to stderr so stdout carries only command output.
fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the terminal game
#[instrument(skip_all, fields(db_path = %config.database_path()))]
async fn run_play(config: HanoiConfig) -> Result<()> {
    let store = HighScoreRepository::open(config.database_path().clone())?;
    info!("Best records ready");
    run_tui(config, Box::new(store)).await
}

/// Run the headless solver
#[instrument(skip_all, fields(disk_count = %config.disk_count()))]
async fn run_solve_command(config: HanoiConfig, format: OutputFormat) -> Result<()> {
    match run_solve(*config.disk_count(), config.pace(), format).await? {
        SolutionOutcome::Completed { .. } => Ok(()),
        SolutionOutcome::Cancelled { moves_applied } => {
            bail!("Solution cancelled after {} moves", moves_applied)
        }
    }
}

/// Print best records
#[instrument(skip_all, fields(db_path = %config.database_path()))]
fn run_scores(config: HanoiConfig) -> Result<()> {
    let repo = HighScoreRepository::open(config.database_path().clone())?;
    print_standings(&repo);
    Ok(())
}

/// Delete best records
#[instrument(skip_all, fields(db_path = %config.database_path()))]
fn run_clear_scores(config: HanoiConfig, disks: Option<u8>) -> Result<()> {
    let disk_count = disks.map(DiskCount::new).transpose()?;
    let repo = HighScoreRepository::open(config.database_path().clone())?;
    let removed = repo.clear(disk_count)?;
    println!("Removed {} best record(s)", removed);
    Ok(())
}
