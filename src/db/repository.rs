//! Database repository for best records.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use strictly_hanoi::{DiskCount, HighScoreRecord, HighScoreStore, StoreError};
use tracing::{debug, info, instrument};

use crate::db::{DbError, HighScoreRow, NewHighScoreRow, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Best-record storage backed by a SQLite file.
///
/// Each operation opens its own connection, so the repository is cheap to
/// clone and safe to move into the game controller.
#[derive(Debug, Clone)]
pub struct HighScoreRepository {
    db_path: String,
}

impl HighScoreRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// Does not touch the file. Use [`HighScoreRepository::open`] to also
    /// apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating HighScoreRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and brings its schema up to date.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self::new(db_path)?;
        repo.run_migrations()?;
        Ok(repo)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Gets the stored row for a disk count. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_best(&self, disk_count: DiskCount) -> Result<Option<HighScoreRow>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::high_scores::table
            .find(i32::from(disk_count.get()))
            .select(HighScoreRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = row.is_some(), "Best record lookup");
        Ok(row)
    }

    /// Writes the row for a disk count, replacing any previous one.
    ///
    /// Does not compare against the stored record; see
    /// [`strictly_hanoi::offer_record`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn put_best(
        &self,
        disk_count: DiskCount,
        record: HighScoreRecord,
    ) -> Result<HighScoreRow, DbError> {
        let mut conn = self.connection()?;
        let new_row = NewHighScoreRow::from_record(disk_count, record)?;

        diesel::replace_into(schema::high_scores::table)
            .values(&new_row)
            .execute(&mut conn)?;
        let row = schema::high_scores::table
            .find(*new_row.disk_count())
            .select(HighScoreRow::as_select())
            .first(&mut conn)?;

        info!(%disk_count, %record, "Best record written");
        Ok(row)
    }

    /// Lists every stored row, ordered by disk count.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<HighScoreRow>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::high_scores::table
            .order(schema::high_scores::disk_count.asc())
            .select(HighScoreRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Best records loaded");
        Ok(rows)
    }

    /// Deletes the stored row for one disk count, or every row when
    /// `disk_count` is `None`. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear(&self, disk_count: Option<DiskCount>) -> Result<usize, DbError> {
        let mut conn = self.connection()?;

        let removed = match disk_count {
            Some(count) => diesel::delete(
                schema::high_scores::table.find(i32::from(count.get())),
            )
            .execute(&mut conn)?,
            None => diesel::delete(schema::high_scores::table).execute(&mut conn)?,
        };

        info!(removed, "Best records cleared");
        Ok(removed)
    }
}

impl HighScoreStore for HighScoreRepository {
    #[instrument(skip(self))]
    fn load_best(&self, disk_count: DiskCount) -> Result<Option<HighScoreRecord>, StoreError> {
        let record = self
            .get_best(disk_count)?
            .map(|row| row.to_record())
            .transpose()?;
        Ok(record)
    }

    #[instrument(skip(self))]
    fn save_best(&self, disk_count: DiskCount, record: HighScoreRecord) -> Result<(), StoreError> {
        self.put_best(disk_count, record)?;
        Ok(())
    }
}
