//! SQLite-based habit storage.
//!
//! Persists users, their habits and the dates habits were checked off.
//! The analysis engine never touches this module; it consumes the
//! immutable [`Habit`] records assembled here. Handles are always opened
//! explicitly by the caller, never defaulted at construction time.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::habit::{Habit, Periodicity};

/// One row of the habits table, without its completion history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    pub id: i64,
    pub name: String,
    pub periodicity: Periodicity,
    pub created_at: DateTime<Utc>,
}

/// SQLite database for users, habits and completions.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `path`, creating the schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the database at `data_dir()/habitloom.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened.
    pub fn open_default() -> Result<Self> {
        let path = data_dir()?.join("habitloom.db");
        Ok(Self::open(&path)?)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS habits (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                name        TEXT NOT NULL,
                periodicity TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                UNIQUE(user_id, name)
            );

            CREATE TABLE IF NOT EXISTS completions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id     INTEGER NOT NULL REFERENCES habits(id),
                completed_on TEXT NOT NULL
            );

            -- Indexes for the common lookup patterns
            CREATE INDEX IF NOT EXISTS idx_habits_user_id ON habits(user_id);
            CREATE INDEX IF NOT EXISTS idx_completions_habit_id ON completions(habit_id);",
        )?;
        Ok(())
    }

    /// Create a user.
    ///
    /// # Errors
    /// Returns an error if the name is already taken.
    pub fn add_user(&self, name: &str) -> Result<i64, DatabaseError> {
        self.conn
            .execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
        let id = self.conn.last_insert_rowid();
        debug!(user = name, id, "created user");
        Ok(id)
    }

    /// Whether a user with this name already exists.
    pub fn user_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        let id: Option<i64> = self
            .conn
            .query_row("SELECT id FROM users WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id.is_some())
    }

    /// All user names, alphabetically.
    pub fn users(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT name FROM users ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn user_id(&self, name: &str) -> Result<i64, DatabaseError> {
        self.conn
            .query_row("SELECT id FROM users WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| DatabaseError::UnknownUser(name.to_string()))
    }

    fn habit_id(&self, user: &str, habit: &str) -> Result<i64, DatabaseError> {
        let user_id = self.user_id(user)?;
        self.conn
            .query_row(
                "SELECT id FROM habits WHERE user_id = ?1 AND name = ?2",
                params![user_id, habit],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| DatabaseError::UnknownHabit {
                user: user.to_string(),
                habit: habit.to_string(),
            })
    }

    /// Create a habit for a user. `created_at` defaults to now.
    ///
    /// # Errors
    /// Returns an error if the user is unknown or the habit name is
    /// already taken for this user.
    pub fn add_habit(
        &self,
        user: &str,
        name: &str,
        periodicity: Periodicity,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<i64, DatabaseError> {
        let user_id = self.user_id(user)?;
        let created_at = created_at.unwrap_or_else(Utc::now);
        self.conn.execute(
            "INSERT INTO habits (user_id, name, periodicity, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, name, periodicity.as_str(), created_at.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(user, habit = name, periodicity = %periodicity, id, "created habit");
        Ok(id)
    }

    /// Rename a habit.
    ///
    /// # Errors
    /// Returns an error if the user or habit is unknown.
    pub fn rename_habit(&self, user: &str, old: &str, new: &str) -> Result<(), DatabaseError> {
        let habit_id = self.habit_id(user, old)?;
        self.conn.execute(
            "UPDATE habits SET name = ?1 WHERE id = ?2",
            params![new, habit_id],
        )?;
        debug!(user, from = old, to = new, "renamed habit");
        Ok(())
    }

    /// Delete a habit and all of its completions.
    ///
    /// # Errors
    /// Returns an error if the user or habit is unknown.
    pub fn delete_habit(&self, user: &str, name: &str) -> Result<(), DatabaseError> {
        let habit_id = self.habit_id(user, name)?;
        self.conn.execute(
            "DELETE FROM completions WHERE habit_id = ?1",
            params![habit_id],
        )?;
        self.conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;
        debug!(user, habit = name, "deleted habit");
        Ok(())
    }

    /// Record a completion for a habit on the given date.
    ///
    /// # Errors
    /// Returns an error if the user or habit is unknown.
    pub fn complete_habit(
        &self,
        user: &str,
        name: &str,
        date: NaiveDate,
    ) -> Result<i64, DatabaseError> {
        let habit_id = self.habit_id(user, name)?;
        self.conn.execute(
            "INSERT INTO completions (habit_id, completed_on) VALUES (?1, ?2)",
            params![habit_id, date.format("%Y-%m-%d").to_string()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(user, habit = name, %date, "recorded completion");
        Ok(id)
    }

    /// All completion dates of a habit, in insertion order.
    ///
    /// Accepts both ISO-8601 dates and date-times in the stored column;
    /// times of day are stripped during bucketing anyway.
    ///
    /// # Errors
    /// Returns an error if the user or habit is unknown or a stored date
    /// cannot be parsed.
    pub fn completions(&self, user: &str, name: &str) -> Result<Vec<NaiveDate>, DatabaseError> {
        let habit_id = self.habit_id(user, name)?;
        let mut stmt = self.conn.prepare(
            "SELECT completed_on FROM completions WHERE habit_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| row.get::<_, String>(0))?;
        let raw: Vec<String> = rows.collect::<Result<_, _>>()?;
        raw.iter()
            .map(|value| parse_completion_date(value))
            .collect()
    }

    /// All habit rows of a user, oldest first.
    ///
    /// # Errors
    /// Returns an error if the user is unknown or a stored periodicity or
    /// creation time is corrupt.
    pub fn habits_for_user(&self, user: &str) -> Result<Vec<HabitRow>> {
        let user_id = self.user_id(user)?;
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, periodicity, created_at FROM habits
                 WHERE user_id = ?1 ORDER BY id",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(DatabaseError::from)?;

        let mut habits = Vec::new();
        for row in rows {
            let (id, name, periodicity, created_at) = row.map_err(DatabaseError::from)?;
            let periodicity = Periodicity::from_str(&periodicity)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|_| DatabaseError::InvalidDate {
                    column: "habits.created_at",
                    value: created_at,
                })?
                .with_timezone(&Utc);
            habits.push(HabitRow {
                id,
                name,
                periodicity,
                created_at,
            });
        }
        Ok(habits)
    }

    /// Assemble one habit with its full completion history.
    ///
    /// # Errors
    /// Returns an error if the user or habit is unknown or a stored row
    /// is corrupt.
    pub fn load_habit(&self, user: &str, name: &str) -> Result<Habit> {
        let rows = self.habits_for_user(user)?;
        let row = rows
            .into_iter()
            .find(|row| row.name == name)
            .ok_or_else(|| DatabaseError::UnknownHabit {
                user: user.to_string(),
                habit: name.to_string(),
            })?;
        let completions = self.completions(user, &row.name)?;
        Ok(Habit::new(row.name, row.periodicity, completions))
    }

    /// Assemble all of a user's habits with their completion histories.
    ///
    /// # Errors
    /// Returns an error if the user is unknown or a stored row is corrupt.
    pub fn load_habits(&self, user: &str) -> Result<Vec<Habit>> {
        let rows = self.habits_for_user(user)?;
        let mut habits = Vec::with_capacity(rows.len());
        for row in rows {
            let completions = self.completions(user, &row.name)?;
            habits.push(Habit::new(row.name, row.periodicity, completions));
        }
        Ok(habits)
    }
}

/// Parse a stored completion date: an ISO-8601 date, or a date-time whose
/// time of day is discarded.
fn parse_completion_date(value: &str) -> Result<NaiveDate, DatabaseError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|dt| dt.date())
        .map_err(|_| DatabaseError::InvalidDate {
            column: "completions.completed_on",
            value: value.to_string(),
        })
}
