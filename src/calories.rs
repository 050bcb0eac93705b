use crate::types::WorkoutDraft;

/// Calories per minute per kilogram.
pub const CALORIES_PER_MINUTE_KG: f64 = 5.0;

/// Calories burned for one entry.
///
/// Duration and weight are truncated to whole minutes and whole kilograms
/// before multiplying. No validation: zero or negative inputs pass through.
pub fn estimate(draft: &WorkoutDraft) -> f64 {
    calories_for(draft.duration, draft.weight)
}

pub fn calories_for(duration_min: f64, weight_kg: f64) -> f64 {
    duration_min.trunc() * CALORIES_PER_MINUTE_KG * weight_kg.trunc()
}
