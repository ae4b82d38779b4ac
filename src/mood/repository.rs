// Repository pattern - isolates all mood-entry database access
use async_trait::async_trait;
use chrono::Local;
use rusqlite::params;
use thiserror::Error;

use crate::db::models::MoodEntry;
use crate::error::AppError;
use crate::mood::scoring::Mood;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("A mood entry already exists for this user and class today")]
    AlreadySubmittedToday,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadySubmittedToday => AppError::Conflict(
                "A mood entry was already submitted today for this class.".into(),
            ),
            RepositoryError::Database(e) => AppError::Pool(e),
            RepositoryError::Sql(e) => AppError::Database(e),
        }
    }
}

/// Repository trait - all mood entry operations
#[async_trait]
pub trait MoodRepository: Send + Sync {
    /// Insert a new entry, enforcing the one-per-day-per-(user, class) rule.
    /// The day boundary is process-local midnight.
    async fn insert(
        &self,
        user_id: i64,
        class_id: i64,
        score: i64,
        mood: Mood,
    ) -> Result<MoodEntry, RepositoryError>;

    /// All entries for a class, oldest first.
    async fn for_class(&self, class_id: i64) -> Result<Vec<MoodEntry>, RepositoryError>;

    /// A user's history, newest first.
    async fn for_user(&self, user_id: i64) -> Result<Vec<MoodEntry>, RepositoryError>;

    /// All entries submitted by a teacher's students, oldest first.
    async fn for_teacher(&self, teacher_id: i64) -> Result<Vec<MoodEntry>, RepositoryError>;

    /// A user's most recent entry, if any.
    async fn latest_for_user(&self, user_id: i64) -> Result<Option<MoodEntry>, RepositoryError>;
}

/// SQLite implementation
pub struct SqliteMoodRepository {
    pool: DbPool,
}

impl SqliteMoodRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MoodEntry> {
    Ok(MoodEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        class_id: row.get(2)?,
        score: row.get(3)?,
        mood: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

const ENTRY_COLUMNS: &str = "id, user_id, class_id, score, mood, timestamp";

#[async_trait]
impl MoodRepository for SqliteMoodRepository {
    async fn insert(
        &self,
        user_id: i64,
        class_id: i64,
        score: i64,
        mood: Mood,
    ) -> Result<MoodEntry, RepositoryError> {
        let conn = self.pool.get()?;

        // Timestamps are stored as UTC; the stored value is shifted to local
        // time so the guard follows the process-local calendar day.
        let today = Local::now().format("%Y-%m-%d").to_string();
        let already_today: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM moods
             WHERE user_id = ?1 AND class_id = ?2
               AND date(timestamp, 'localtime') = ?3",
            params![user_id, class_id, today],
            |row| row.get(0),
        )?;

        if already_today {
            return Err(RepositoryError::AlreadySubmittedToday);
        }

        conn.execute(
            "INSERT INTO moods (user_id, class_id, score, mood) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, class_id, score, mood.as_str()],
        )?;
        let id = conn.last_insert_rowid();

        let entry = conn.query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM moods WHERE id = ?1"),
            params![id],
            entry_from_row,
        )?;
        Ok(entry)
    }

    async fn for_class(&self, class_id: i64) -> Result<Vec<MoodEntry>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM moods WHERE class_id = ?1 ORDER BY timestamp ASC, id ASC"
        ))?;
        let entries = stmt
            .query_map(params![class_id], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn for_user(&self, user_id: i64) -> Result<Vec<MoodEntry>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM moods WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC"
        ))?;
        let entries = stmt
            .query_map(params![user_id], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn for_teacher(&self, teacher_id: i64) -> Result<Vec<MoodEntry>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT m.id, m.user_id, m.class_id, m.score, m.mood, m.timestamp
             FROM moods m
             JOIN users u ON u.id = m.user_id
             WHERE u.teacher_id = ?1
             ORDER BY m.timestamp ASC, m.id ASC",
        )?;
        let entries = stmt
            .query_map(params![teacher_id], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<MoodEntry>, RepositoryError> {
        let conn = self.pool.get()?;
        let result = conn.query_row(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM moods WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC LIMIT 1"
            ),
            params![user_id],
            entry_from_row,
        );
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
