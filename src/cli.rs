//! Command-line interface for strictly_hanoi.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strictly Hanoi - Tower of Hanoi in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_hanoi")]
#[command(about = "Tower of Hanoi with a paced solver and best records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to strictly_hanoi.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file for best records (overrides config and STRICTLY_HANOI_DB)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Disks to start with (3-12)
        #[arg(short, long)]
        disks: Option<u8>,

        /// Delay between solver moves, in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,
    },

    /// Print the optimal solution, one move per pace
    Solve {
        /// Disks to solve (3-12)
        #[arg(short, long)]
        disks: Option<u8>,

        /// Delay between moves, in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,

        /// Print one JSON event per line
        #[arg(long)]
        json: bool,
    },

    /// List best records per disk count
    Scores,

    /// Delete best records
    ClearScores {
        /// Only clear this disk count
        #[arg(short, long)]
        disks: Option<u8>,
    },
}
