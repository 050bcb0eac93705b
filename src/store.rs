//! Persistence contract used by the submission pipeline and the aggregators.

use crate::error::StoreError;
use crate::types::{StoredId, UserId, WorkoutEntry};
use chrono::{DateTime, Utc};

pub trait WorkoutStore {
    /// Persist one entry. Failures are surfaced, never retried.
    fn insert(&mut self, entry: &WorkoutEntry) -> Result<StoredId, StoreError>;

    /// All entries of `user` with `start <= date < end`, in no particular
    /// order. An empty result is not an error.
    fn query_range(
        &mut self,
        user: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEntry>, StoreError>;
}

impl<S: WorkoutStore + ?Sized> WorkoutStore for Box<S> {
    fn insert(&mut self, entry: &WorkoutEntry) -> Result<StoredId, StoreError> {
        (**self).insert(entry)
    }

    fn query_range(
        &mut self,
        user: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEntry>, StoreError> {
        (**self).query_range(user, start, end)
    }
}

/// Vec-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Vec<WorkoutEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WorkoutStore for MemoryStore {
    fn insert(&mut self, entry: &WorkoutEntry) -> Result<StoredId, StoreError> {
        self.entries.push(entry.clone());
        StoredId::try_from(self.entries.len())
            .map_err(|_| StoreError::Corrupt("memory store id overflow".into()))
    }

    fn query_range(
        &mut self,
        user: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEntry>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| &e.user == user && e.date >= start && e.date < end)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(user: &str, date: DateTime<Utc>) -> WorkoutEntry {
        WorkoutEntry {
            category: "Cat".into(),
            workout_name: "Row".into(),
            sets: 1,
            reps: 1,
            weight: 10.0,
            duration: 1.0,
            calories_burned: 50.0,
            user: UserId::new(user),
            date,
        }
    }

    #[test]
    fn test_memory_store_range_is_half_open_and_per_user() {
        let start = Utc.with_ymd_and_hms(2024, 7, 25, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 26, 0, 0, 0).unwrap();

        let mut store = MemoryStore::new();
        assert_eq!(store.insert(&entry("a", start)).unwrap(), 1);
        store.insert(&entry("a", end)).unwrap();
        store.insert(&entry("b", start)).unwrap();
        assert_eq!(store.len(), 3);

        let got = store.query_range(&UserId::new("a"), start, end).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, start);

        let none = store.query_range(&UserId::new("c"), start, end).unwrap();
        assert!(none.is_empty());
    }
}
