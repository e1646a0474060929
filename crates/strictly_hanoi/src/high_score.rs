//! Best-score records and the persistence contract.
//!
//! The controller decides whether a finished game beats the stored record;
//! stores only load and save.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::DiskCount;

/// Best known result for one disk count.
///
/// Records order by fewer moves first, then by shorter time, so the
/// smaller record is the better one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{} moves in {}s", moves, seconds)]
pub struct HighScoreRecord {
    moves: u32,
    seconds: u64,
}

impl HighScoreRecord {
    /// Creates a record.
    pub fn new(moves: u32, seconds: u64) -> Self {
        Self { moves, seconds }
    }

    /// Moves taken.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Elapsed whole seconds.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// True when this record should replace `stored`.
    ///
    /// Anything beats an absent record. Equal records do not replace.
    pub fn beats(&self, stored: Option<&HighScoreRecord>) -> bool {
        stored.is_none_or(|stored| self < stored)
    }
}

/// Persistence failure in a high-score store.
#[derive(Debug, Clone, Display, Error)]
#[display("High score store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Storage for one best record per disk count.
pub trait HighScoreStore: Send {
    /// Loads the stored record for a disk count, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage medium fails.
    fn load_best(&self, disk_count: DiskCount) -> Result<Option<HighScoreRecord>, StoreError>;

    /// Stores a record, replacing any previous one for the disk count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage medium fails.
    fn save_best(&self, disk_count: DiskCount, record: HighScoreRecord) -> Result<(), StoreError>;
}

/// Offers a finished game's record to a store.
///
/// Saves only when the record beats the stored one. Returns whether it
/// was saved.
///
/// # Errors
///
/// Returns [`StoreError`] if loading or saving fails.
#[instrument(skip(store))]
pub fn offer_record(
    store: &dyn HighScoreStore,
    disk_count: DiskCount,
    record: HighScoreRecord,
) -> Result<bool, StoreError> {
    let stored = store.load_best(disk_count)?;
    if !record.beats(stored.as_ref()) {
        debug!(?stored, "Record does not beat stored best");
        return Ok(false);
    }
    store.save_best(disk_count, record)?;
    info!(%disk_count, %record, "New best record saved");
    Ok(true)
}

/// Best records for every supported disk count, ascending.
///
/// Disk counts whose lookup fails are reported as having no record.
#[instrument(skip(store))]
pub fn standings(store: &dyn HighScoreStore) -> Vec<(DiskCount, Option<HighScoreRecord>)> {
    DiskCount::all()
        .map(|count| {
            let record = store.load_best(count).unwrap_or_else(|e| {
                warn!(disk_count = %count, error = %e, "Failed to load best record");
                None
            });
            (count, record)
        })
        .collect()
}

/// In-process store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    records: Arc<Mutex<HashMap<DiskCount, HighScoreRecord>>>,
}

impl MemoryHighScores {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_best(&self, disk_count: DiskCount) -> Result<Option<HighScoreRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::new(format!("Record map poisoned: {}", e)))?;
        Ok(records.get(&disk_count).copied())
    }

    fn save_best(&self, disk_count: DiskCount, record: HighScoreRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::new(format!("Record map poisoned: {}", e)))?;
        records.insert(disk_count, record);
        Ok(())
    }
}
