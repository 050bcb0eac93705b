//! Per-day and trailing-window aggregation over stored workouts.
//!
//! A "day" is the calendar day `[midnight, next midnight)` in the configured
//! time zone, not a rolling 24 hours. Every query is read-only; empty days
//! produce zero-valued results.

use crate::dlog;
use crate::error::StoreError;
use crate::store::WorkoutStore;
use crate::types::{
    CategoryTotal, DailySummary, Dashboard, DayWorkouts, PieSlice, TrendPoint, TrendSeries,
    UserId, WeeklyCalories, WorkoutEntry,
};
use crate::utils::day_label;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

pub const DEFAULT_TREND_DAYS: usize = 7;

/// Longest trend window served; one store query is issued per day.
pub const MAX_TREND_DAYS: usize = 366;

/// First instant of `date` in `tz`.
///
/// If local midnight does not exist (a DST jump at 00:00) the day starts at
/// the first local hour that does; if it is ambiguous the earlier instant
/// wins.
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=3)
        .find_map(|h| {
            let local = midnight.checked_add_signed(TimeDelta::hours(h))?;
            tz.from_local_datetime(&local).earliest()
        })
        .map_or_else(
            || Utc.from_utc_datetime(&midnight),
            |dt| dt.with_timezone(&Utc),
        )
}

/// `[start, end)` covering the calendar day `date` in `tz`.
///
/// The last representable day ends at `DateTime::<Utc>::MAX_UTC`.
pub fn day_window(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(tz, date);
    let end = date.succ_opt().map_or_else(
        || {
            start
                .checked_add_signed(TimeDelta::days(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        },
        |next| local_midnight(tz, next),
    );
    (start, end)
}

/// The calendar date of `instant` in `tz`.
pub fn local_date(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Reduce one day's entries into a summary. Order of `entries` does not
/// matter; categories appear in order of their first workout that day.
pub fn summarize_entries(date: NaiveDate, entries: &[WorkoutEntry]) -> DailySummary {
    let mut sorted: Vec<&WorkoutEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.workout_name.cmp(&b.workout_name))
    });

    let mut breakdown: Vec<CategoryTotal> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut total = 0.0;

    for e in &sorted {
        total += e.calories_burned;
        let idx = *slot.entry(e.category.as_str()).or_insert_with(|| {
            breakdown.push(CategoryTotal {
                category: e.category.clone(),
                total_calories: 0.0,
            });
            breakdown.len() - 1
        });
        breakdown[idx].total_calories += e.calories_burned;
    }

    let count = sorted.len();
    let avg = if count > 0 { total / count as f64 } else { 0.0 };

    DailySummary {
        date,
        total_calories_burnt: total,
        total_workouts: count,
        avg_calories_per_workout: avg,
        category_breakdown: breakdown,
    }
}

/// Computes single-day figures for one user.
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    tz: Tz,
}

impl DailyAggregator {
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Entries of `user` on `date`, oldest first.
    pub fn entries<S>(
        &self,
        store: &mut S,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutEntry>, StoreError>
    where
        S: WorkoutStore + ?Sized,
    {
        let (start, end) = day_window(&self.tz, date);
        let mut entries = store.query_range(user, start, end)?;
        entries.sort_by(|a, b| a.date.cmp(&b.date));
        dlog!("day_query user={user} date={date} matched={}", entries.len());
        Ok(entries)
    }

    pub fn summarize<S>(
        &self,
        store: &mut S,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<DailySummary, StoreError>
    where
        S: WorkoutStore + ?Sized,
    {
        let entries = self.entries(store, user, date)?;
        Ok(summarize_entries(date, &entries))
    }

    /// Total calories only.
    pub fn total<S>(&self, store: &mut S, user: &UserId, date: NaiveDate) -> Result<f64, StoreError>
    where
        S: WorkoutStore + ?Sized,
    {
        let entries = self.entries(store, user, date)?;
        Ok(entries.iter().map(|e| e.calories_burned).sum())
    }
}

/// Daily totals over the `days` calendar days ending on a reference date.
#[derive(Debug, Clone)]
pub struct TrendAggregator {
    daily: DailyAggregator,
    days: usize,
}

impl TrendAggregator {
    /// `days` is capped at [`MAX_TREND_DAYS`].
    pub fn new(tz: Tz, days: usize) -> Self {
        Self {
            daily: DailyAggregator::new(tz),
            days: days.min(MAX_TREND_DAYS),
        }
    }

    pub const fn days(&self) -> usize {
        self.days
    }

    pub const fn daily(&self) -> &DailyAggregator {
        &self.daily
    }

    /// One point per day, oldest first, `days` long.
    ///
    /// Dates are strictly ascending. A window reaching past the first
    /// representable date starts at that date and is shorter.
    pub fn trend<S>(
        &self,
        store: &mut S,
        user: &UserId,
        reference: NaiveDate,
    ) -> Result<TrendSeries, StoreError>
    where
        S: WorkoutStore + ?Sized,
    {
        let Some(last_back) = self.days.checked_sub(1) else {
            return Ok(TrendSeries { points: Vec::new() });
        };
        let first = reference
            .checked_sub_days(Days::new(last_back as u64))
            .unwrap_or(NaiveDate::MIN);

        let mut points = Vec::with_capacity(self.days);
        for date in first.iter_days().take_while(|d| *d <= reference) {
            let calories = self.daily.total(store, user, date)?;
            points.push(TrendPoint {
                date,
                label: day_label(date),
                calories,
            });
        }
        Ok(TrendSeries { points })
    }
}

/// Today's summary and the trailing trend, shaped for chart consumption.
pub fn build_dashboard(summary: &DailySummary, trend: &TrendSeries) -> Dashboard {
    let pie_chart_data = summary
        .category_breakdown
        .iter()
        .enumerate()
        .map(|(id, c)| PieSlice {
            id,
            value: c.total_calories,
            label: c.category.clone(),
        })
        .collect();

    Dashboard {
        total_calories_burnt: summary.total_calories_burnt,
        total_workouts: summary.total_workouts,
        avg_calories_burnt_per_workout: summary.avg_calories_per_workout,
        total_weeks_calories_burnt: WeeklyCalories {
            weeks: trend.labels(),
            calories_burned: trend.calories(),
        },
        pie_chart_data,
    }
}

pub fn dashboard<S>(
    store: &mut S,
    trend: &TrendAggregator,
    user: &UserId,
    reference: NaiveDate,
) -> Result<Dashboard, StoreError>
where
    S: WorkoutStore + ?Sized,
{
    let summary = trend.daily().summarize(store, user, reference)?;
    let series = trend.trend(store, user, reference)?;
    tracing::info!(
        user = %user,
        date = %reference,
        trend_days = trend.days(),
        workouts = summary.total_workouts,
        calories = summary.total_calories_burnt,
        "dashboard computed"
    );
    Ok(build_dashboard(&summary, &series))
}

pub fn list_day<S>(
    store: &mut S,
    daily: &DailyAggregator,
    user: &UserId,
    date: NaiveDate,
) -> Result<DayWorkouts, StoreError>
where
    S: WorkoutStore + ?Sized,
{
    let todays_workouts = daily.entries(store, user, date)?;
    let total_calories_burnt = todays_workouts.iter().map(|e| e.calories_burned).sum();
    Ok(DayWorkouts {
        todays_workouts,
        total_calories_burnt,
    })
}
