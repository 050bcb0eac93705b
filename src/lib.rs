//! fitlog: parse a compact workout log format, derive calories burned and
//! summarize them per calendar day and over a trailing window.

pub mod aggregate;
pub mod calories;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod pg;
pub mod store;
pub mod types;
pub mod utils;

pub use error::{ApiError, ParseError, StoreError, SubmitError};
pub use store::WorkoutStore;
pub use types::{DailySummary, TrendSeries, UserId, WorkoutEntry};
