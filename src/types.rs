use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the user a workout belongs to, as resolved by whoever
/// authenticated the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row id handed back by a store after an insert.
pub type StoredId = i64;

/// One parsed block, before calories are derived and before it is bound to
/// a user and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub category: String,
    pub workout_name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub duration: f64,
}

/// The persisted unit. `calories_burned` is always derived by
/// [`crate::calories::estimate`], never taken from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub category: String,
    pub workout_name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub duration: f64,
    pub calories_burned: f64,
    pub user: UserId,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_calories: f64,
}

/// Totals for one calendar day. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_calories_burnt: f64,
    pub total_workouts: usize,
    pub avg_calories_per_workout: f64,
    pub category_breakdown: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub calories: f64,
}

/// Daily totals over a trailing window, oldest day first, zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn calories(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.calories).collect()
    }
}

/// Slice of a pie chart: one category's calories for the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub id: usize,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCalories {
    pub weeks: Vec<String>,
    pub calories_burned: Vec<f64>,
}

/// Everything the dashboard shows for one reference day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_calories_burnt: f64,
    pub total_workouts: usize,
    pub avg_calories_burnt_per_workout: f64,
    pub total_weeks_calories_burnt: WeeklyCalories,
    pub pie_chart_data: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWorkouts {
    pub todays_workouts: Vec<WorkoutEntry>,
    pub total_calories_burnt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub workouts: Vec<WorkoutEntry>,
}

impl SubmissionResponse {
    pub fn new(workouts: Vec<WorkoutEntry>) -> Self {
        Self {
            message: "Workouts added successfully".to_string(),
            workouts,
        }
    }
}
