//! Runtime configuration, built once from the command line and passed down
//! explicitly.

use crate::aggregate::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use crate::cli::Cli;
use crate::error::ConfigError;
use crate::types::UserId;
use chrono_tz::Tz;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite(PathBuf),
    Postgres(String),
}

/// Time zone whose calendar days bound the aggregation windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneConfig {
    pub tz: Tz,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            tz: get_local_timezone(),
        }
    }
}

impl TimezoneConfig {
    pub fn from_cli(timezone: Option<&str>, use_utc: bool) -> Result<Self, ConfigError> {
        if use_utc {
            return Ok(Self { tz: Tz::UTC });
        }

        match timezone {
            Some(name) => Tz::from_str(name)
                .map(|tz| Self { tz })
                .map_err(|_| ConfigError::InvalidTimezone(name.to_string())),
            None => Ok(Self::default()),
        }
    }

    pub fn name(&self) -> &str {
        self.tz.name()
    }
}

/// `TZ` first, then the system zone, then UTC.
pub fn get_local_timezone() -> Tz {
    if let Ok(tz_str) = std::env::var("TZ")
        && let Ok(tz) = Tz::from_str(&tz_str)
    {
        tracing::debug!(tz = %tz_str, "using timezone from TZ");
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => Tz::from_str(&tz_str).unwrap_or_else(|_| {
            tracing::debug!(tz = %tz_str, "unrecognized system timezone, falling back to UTC");
            Tz::UTC
        }),
        Err(e) => {
            tracing::debug!(err = ?e, "could not detect system timezone, falling back to UTC");
            Tz::UTC
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub user: UserId,
    pub timezone: TimezoneConfig,
    pub trend_days: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::Sqlite(PathBuf::from(crate::cli::DEFAULT_DB_PATH)),
            user: UserId::new(crate::cli::DEFAULT_USER),
            timezone: TimezoneConfig::default(),
            trend_days: DEFAULT_TREND_DAYS,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.days == 0 {
            return Err(ConfigError::ZeroTrendDays);
        }
        if cli.days > MAX_TREND_DAYS {
            return Err(ConfigError::TrendDaysTooLarge(cli.days));
        }

        let store = cli.pg_url.as_ref().map_or_else(
            || StoreConfig::Sqlite(cli.db.clone()),
            |url| StoreConfig::Postgres(url.clone()),
        );

        Ok(Self {
            store,
            user: UserId::new(cli.user.clone()),
            timezone: TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?,
            trend_days: cli.days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_timezone_utc_flag_wins() {
        let tz = TimezoneConfig::from_cli(Some("Asia/Tokyo"), true).unwrap();
        assert_eq!(tz.tz, Tz::UTC);
    }

    #[test]
    fn test_timezone_explicit() {
        let tz = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();
        assert_eq!(tz.name(), "America/New_York");
    }

    #[test]
    fn test_timezone_invalid() {
        assert_eq!(
            TimezoneConfig::from_cli(Some("Invalid/Zone"), false),
            Err(ConfigError::InvalidTimezone("Invalid/Zone".into()))
        );
    }

    #[test]
    fn test_config_defaults_to_sqlite() {
        let cli = Cli::parse_from(["fitlog", "--utc", "day"]);
        let cfg = Config::from_cli(&cli).unwrap();
        assert_eq!(cfg.store, StoreConfig::Sqlite(PathBuf::from("fitlog.db")));
        assert_eq!(cfg.user, UserId::new("local"));
        assert_eq!(cfg.trend_days, 7);
        assert_eq!(cfg.timezone.tz, Tz::UTC);
    }

    #[test]
    fn test_config_pg_url_selects_postgres() {
        let cli = Cli::parse_from([
            "fitlog",
            "--pg-url",
            "postgres://127.0.0.1/fitlog",
            "--user",
            "ana",
            "dashboard",
        ]);
        let cfg = Config::from_cli(&cli).unwrap();
        assert_eq!(
            cfg.store,
            StoreConfig::Postgres("postgres://127.0.0.1/fitlog".into())
        );
        assert_eq!(cfg.user.as_str(), "ana");
    }

    #[test]
    fn test_config_rejects_zero_days() {
        let cli = Cli::parse_from(["fitlog", "--days", "0", "dashboard"]);
        assert_eq!(Config::from_cli(&cli).unwrap_err(), ConfigError::ZeroTrendDays);
    }

    #[test]
    fn test_config_rejects_oversized_trend() {
        let huge = usize::MAX.to_string();
        let cli = Cli::parse_from(["fitlog", "--days", huge.as_str(), "dashboard"]);
        assert_eq!(
            Config::from_cli(&cli).unwrap_err(),
            ConfigError::TrendDaysTooLarge(usize::MAX)
        );

        let cli = Cli::parse_from(["fitlog", "--days", "366", "dashboard"]);
        assert_eq!(Config::from_cli(&cli).unwrap().trend_days, MAX_TREND_DAYS);
    }
}
