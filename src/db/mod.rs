//! SQLite persistence for best records, one row per disk count.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{HighScoreRow, NewHighScoreRow};
pub use repository::{HighScoreRepository, MIGRATIONS};
