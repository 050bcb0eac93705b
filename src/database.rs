use crate::dlog;
use crate::error::StoreError;
use crate::store::WorkoutStore;
use crate::types::{StoredId, UserId, WorkoutEntry};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, params};
use std::path::Path;

/// SQLite-backed store. Dates are kept as UTC milliseconds.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        tracing::info!(path = %path.display(), "opening sqlite store");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    if table_exists(conn, "workouts")? {
        dlog!("sqlite schema present");
        return Ok(());
    }

    tracing::info!("creating sqlite schema");
    conn.execute_batch(
        r"
        CREATE TABLE workouts (
          id               INTEGER PRIMARY KEY AUTOINCREMENT,
          user_id          TEXT NOT NULL,
          category         TEXT NOT NULL,
          workout_name     TEXT NOT NULL,
          sets             INTEGER NOT NULL,
          reps             INTEGER NOT NULL,
          weight           REAL NOT NULL,
          duration         REAL NOT NULL,
          calories_burned  REAL NOT NULL,
          date_ms          INTEGER NOT NULL
        );

        CREATE INDEX workouts_user_date_idx ON workouts (user_id, date_ms);
        ",
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

impl WorkoutStore for SqliteStore {
    fn insert(&mut self, e: &WorkoutEntry) -> Result<StoredId, StoreError> {
        self.conn.execute(
            r"
            INSERT INTO workouts (
              user_id, category, workout_name,
              sets, reps, weight, duration,
              calories_burned, date_ms
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                e.user.as_str(),
                e.category,
                e.workout_name,
                e.sets,
                e.reps,
                e.weight,
                e.duration,
                e.calories_burned,
                e.date.timestamp_millis(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_range(
        &mut self,
        user: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEntry>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            r"
            SELECT
                id,
                category,
                workout_name,
                sets,
                reps,
                weight,
                duration,
                calories_burned,
                date_ms
            FROM workouts
            WHERE user_id = ?1 AND date_ms >= ?2 AND date_ms < ?3
            ",
        )?;
        let mut rows = stmt.query(params![
            user.as_str(),
            start.timestamp_millis(),
            end.timestamp_millis()
        ])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let date_ms: i64 = row.get(8)?;

            let Some(date) = Utc.timestamp_millis_opt(date_ms).single() else {
                return Err(StoreError::Corrupt(format!(
                    "workout {id} has bad date_ms={date_ms}"
                )));
            };

            out.push(WorkoutEntry {
                category: row.get(1)?,
                workout_name: row.get(2)?,
                sets: row.get(3)?,
                reps: row.get(4)?,
                weight: row.get(5)?,
                duration: row.get(6)?,
                calories_burned: row.get(7)?,
                user: user.clone(),
                date,
            });
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, date: DateTime<Utc>) -> WorkoutEntry {
        WorkoutEntry {
            category: "Chest".into(),
            workout_name: "Bench".into(),
            sets: 3,
            reps: 10,
            weight: 50.5,
            duration: 10.25,
            calories_burned: 2500.0,
            user: UserId::new(user),
            date,
        }
    }

    #[test]
    fn test_insert_and_query_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let t = Utc.with_ymd_and_hms(2024, 7, 25, 10, 30, 0).unwrap();

        let id1 = store.insert(&entry("a", t)).unwrap();
        let id2 = store.insert(&entry("b", t)).unwrap();
        assert!(id2 > id1);

        let got = store
            .query_range(&UserId::new("a"), t, t + chrono::TimeDelta::seconds(1))
            .unwrap();
        assert_eq!(got, vec![entry("a", t)]);
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let t = Utc.with_ymd_and_hms(2024, 7, 26, 0, 0, 0).unwrap();
        store.insert(&entry("a", t)).unwrap();

        let start = t - chrono::TimeDelta::days(1);
        assert!(store.query_range(&UserId::new("a"), start, t).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitlog.db");
        let t = Utc.with_ymd_and_hms(2024, 7, 25, 10, 30, 0).unwrap();

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert(&entry("a", t)).unwrap();
        }

        let mut store = SqliteStore::open(&path).unwrap();
        let end = t + chrono::TimeDelta::hours(1);
        assert_eq!(store.query_range(&UserId::new("a"), t, end).unwrap().len(), 1);
    }
}
