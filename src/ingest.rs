use crate::calories;
use crate::dlog;
use crate::error::SubmitError;
use crate::parser;
use crate::store::WorkoutStore;
use crate::types::{UserId, WorkoutDraft, WorkoutEntry};
use chrono::{DateTime, Utc};

/// Parse `raw`, derive calories and persist every block for `user`,
/// stamped with `at`.
///
/// Parsing is all-or-nothing. Persistence is not: each entry is a separate
/// insert, and when one fails the entries before it stay stored. The error
/// reports how many were committed.
pub fn submit<S>(
    store: &mut S,
    user: &UserId,
    raw: &str,
    at: DateTime<Utc>,
) -> Result<Vec<WorkoutEntry>, SubmitError>
where
    S: WorkoutStore + ?Sized,
{
    if raw.trim().is_empty() {
        return Err(SubmitError::MissingInput);
    }

    let drafts = parser::parse(raw).inspect_err(|e| {
        tracing::warn!(user = %user, err = %e, "rejected workout submission");
    })?;

    let entries: Vec<WorkoutEntry> = drafts
        .into_iter()
        .map(|d| complete(d, user, at))
        .collect();

    for (committed, entry) in entries.iter().enumerate() {
        let id = store.insert(entry).map_err(|source| {
            tracing::error!(
                user = %user,
                committed,
                err = %source,
                "storing workout failed; earlier entries were kept"
            );
            SubmitError::Store { committed, source }
        })?;
        dlog!("stored id={id} category={} name={}", entry.category, entry.workout_name);
    }

    tracing::info!(user = %user, workouts = entries.len(), "workouts added");
    Ok(entries)
}

/// Attach the derived calories, owner and timestamp to a parsed block.
pub fn complete(draft: WorkoutDraft, user: &UserId, at: DateTime<Utc>) -> WorkoutEntry {
    let calories_burned = calories::estimate(&draft);
    let WorkoutDraft {
        category,
        workout_name,
        sets,
        reps,
        weight,
        duration,
    } = draft;

    WorkoutEntry {
        category,
        workout_name,
        sets,
        reps,
        weight,
        duration,
        calories_burned,
        user: user.clone(),
        date: at,
    }
}
