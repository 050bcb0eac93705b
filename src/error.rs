//! Error types for fitlog.
//!
//! Parse errors are user-correctable and carry the 1-based index of the
//! offending block. Store errors are opaque and surface as a generic server
//! failure. [`ApiError`] is the body handed back to callers for either.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One of the five newline-separated fields of a workout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Name,
    SetsReps,
    Weight,
    Duration,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Category => "category",
            Self::Name => "workout name",
            Self::SetsReps => "sets/reps",
            Self::Weight => "weight",
            Self::Duration => "duration",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No categories found in workout string")]
    NoCategories,

    #[error("Workout {0} must start with a #category line")]
    MalformedBlock(usize),

    #[error("Workout string is missing fields for workout {0}")]
    MissingFields(usize),

    #[error("Invalid {1} format in workout {0}")]
    InvalidFormat(usize, Field),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    /// Failure while connecting to or preparing a database.
    #[error("{step}: {source}")]
    Setup {
        step: &'static str,
        #[source]
        source: postgres::Error,
    },

    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    #[error("Corrupt stored row: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Workout string is missing")]
    MissingInput,

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An insert failed after `committed` earlier entries were written.
    /// Those writes are not rolled back.
    #[error("Storing workout {} failed after {committed} were saved: {source}", .committed + 1)]
    Store {
        committed: usize,
        #[source]
        source: StoreError,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid timezone: '{0}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'")]
    InvalidTimezone(String),

    #[error("Trend window must cover at least one day")]
    ZeroTrendDays,

    #[error("Trend window of {0} days is too long (at most {max})", max = crate::aggregate::MAX_TREND_DAYS)]
    TrendDaysTooLarge(usize),
}

/// Error body returned to callers: `{ success, status, message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
        }
    }
}

impl From<&ParseError> for ApiError {
    fn from(e: &ParseError) -> Self {
        Self::new(400, e.to_string())
    }
}

impl From<&StoreError> for ApiError {
    fn from(_: &StoreError) -> Self {
        Self::new(500, "Something went wrong")
    }
}

impl From<&SubmitError> for ApiError {
    fn from(e: &SubmitError) -> Self {
        match e {
            SubmitError::MissingInput => Self::new(400, e.to_string()),
            SubmitError::Parse(p) => p.into(),
            SubmitError::Store { source, .. } => source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_carries_index() {
        assert_eq!(
            ParseError::MissingFields(3).to_string(),
            "Workout string is missing fields for workout 3"
        );
        assert_eq!(
            ParseError::InvalidFormat(2, Field::Weight).to_string(),
            "Invalid weight format in workout 2"
        );
    }

    #[test]
    fn test_parse_errors_map_to_400() {
        let api = ApiError::from(&SubmitError::Parse(ParseError::NoCategories));
        assert_eq!(api.status, 400);
        assert!(!api.success);
        assert_eq!(api.message, "No categories found in workout string");

        let api = ApiError::from(&SubmitError::MissingInput);
        assert_eq!(api.status, 400);
    }

    #[test]
    fn test_store_error_is_generic_500() {
        let err = SubmitError::Store {
            committed: 1,
            source: StoreError::Corrupt("bad row".into()),
        };
        assert_eq!(
            err.to_string(),
            "Storing workout 2 failed after 1 were saved: Corrupt stored row: bad row"
        );

        let api = ApiError::from(&err);
        assert_eq!(api.status, 500);
        assert_eq!(api.message, "Something went wrong");
    }

    #[test]
    fn test_store_setup_error_names_step() {
        let err = StoreError::InvalidUrl("missing database name".into());
        assert_eq!(err.to_string(), "Invalid database URL: missing database name");
        assert_eq!(ApiError::from(&err).status, 500);
    }

    #[test]
    fn test_api_error_json_shape() {
        let v = serde_json::to_value(ApiError::new(400, "nope")).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["status"], 400);
        assert_eq!(v["message"], "nope");
    }
}
