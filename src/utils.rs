use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::io::{self, Read};
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging on stderr.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,fitlog={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Day of month with its ordinal suffix: `1st`, `2nd`, `11th`, `23rd`.
pub fn day_label(date: NaiveDate) -> String {
    let d = date.day();
    let suffix = match (d % 10, d % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{d}{suffix}")
}

/// Use `arg` unless it is absent or `-`, in which case read all of stdin.
pub fn read_text_arg(arg: Option<String>) -> Result<String> {
    match arg {
        Some(s) if s != "-" => Ok(s),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading workout text from stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_label_suffixes() {
        let label = |d| day_label(NaiveDate::from_ymd_opt(2024, 1, d).unwrap());
        assert_eq!(label(1), "1st");
        assert_eq!(label(2), "2nd");
        assert_eq!(label(3), "3rd");
        assert_eq!(label(4), "4th");
        assert_eq!(label(11), "11th");
        assert_eq!(label(12), "12th");
        assert_eq!(label(13), "13th");
        assert_eq!(label(21), "21st");
        assert_eq!(label(22), "22nd");
        assert_eq!(label(31), "31st");
    }

    #[test]
    fn test_read_text_arg_passthrough() {
        assert_eq!(read_text_arg(Some("#A".into())).unwrap(), "#A");
    }
}
