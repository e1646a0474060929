//! Database models for best records.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use strictly_hanoi::{DiskCount, HighScoreRecord};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored best record for one disk count.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::high_scores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HighScoreRow {
    disk_count: i32,
    moves: i32,
    seconds: i64,
    recorded_at: NaiveDateTime,
}

impl HighScoreRow {
    /// Disk count of this row, validated against the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored value is out of range.
    #[instrument(skip(self), fields(disk_count = self.disk_count))]
    pub fn parse_disk_count(&self) -> Result<DiskCount, DbError> {
        u8::try_from(self.disk_count)
            .ok()
            .and_then(|n| DiskCount::new(n).ok())
            .ok_or_else(|| DbError::new(format!("Invalid disk count: {}", self.disk_count)))
    }

    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if moves or seconds are negative.
    #[instrument(skip(self), fields(disk_count = self.disk_count))]
    pub fn to_record(&self) -> Result<HighScoreRecord, DbError> {
        let moves = u32::try_from(self.moves)
            .map_err(|_| DbError::new(format!("Invalid move count: {}", self.moves)))?;
        let seconds = u64::try_from(self.seconds)
            .map_err(|_| DbError::new(format!("Invalid seconds: {}", self.seconds)))?;
        Ok(HighScoreRecord::new(moves, seconds))
    }
}

/// Insertable best record.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::high_scores)]
pub struct NewHighScoreRow {
    disk_count: i32,
    moves: i32,
    seconds: i64,
}

impl NewHighScoreRow {
    /// Builds a row from a domain record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the record does not fit the column types.
    #[instrument]
    pub fn from_record(disk_count: DiskCount, record: HighScoreRecord) -> Result<Self, DbError> {
        let moves = i32::try_from(record.moves())
            .map_err(|_| DbError::new(format!("Move count too large: {}", record.moves())))?;
        let seconds = i64::try_from(record.seconds())
            .map_err(|_| DbError::new(format!("Seconds too large: {}", record.seconds())))?;
        Ok(Self::new(i32::from(disk_count.get()), moves, seconds))
    }
}
