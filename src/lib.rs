//! Strictly Hanoi application: terminal UI, headless solver and SQLite
//! best records around the [`strictly_hanoi`] engine.
//!
//! # Architecture
//!
//! - **Config**: TOML file plus environment overrides ([`HanoiConfig`])
//! - **Database**: best records per disk count ([`HighScoreRepository`])
//! - **TUI**: ratatui front end driving a shared controller ([`run_tui`])
//! - **Console**: paced solution replay on stdout ([`run_solve`])
//!
//! # Example
//!
//! ```no_run
//! use strictly_hanoi_app::{HanoiConfig, HighScoreRepository, run_tui};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HanoiConfig::load(None)?;
//! let store = HighScoreRepository::open(config.database_path().clone())?;
//! run_tui(config, Box::new(store)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod console;
mod db;
mod tui;

pub use config::{ConfigError, DATABASE_ENV, DEFAULT_CONFIG_FILE, HanoiConfig};
pub use console::{MovePrinter, OutputFormat, format_standings, print_standings, run_solve};
pub use db::{DbError, HighScoreRepository, HighScoreRow, MIGRATIONS, NewHighScoreRow};
pub use tui::{App, Command, Snapshot, command_for, run_tui};

pub use strictly_hanoi;
