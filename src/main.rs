#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use fitlog::aggregate::{self, DailyAggregator, TrendAggregator};
use fitlog::cli::{self, Cmd};
use fitlog::config::{Config, StoreConfig};
use fitlog::database::SqliteStore;
use fitlog::pg::PgStore;
use fitlog::types::SubmissionResponse;
use fitlog::{ApiError, StoreError, WorkoutStore, ingest, utils};
use serde::Serialize;
use std::process::ExitCode;

#[macro_use]
extern crate fitlog;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = Config::from_cli(&cli)?;
    dlog!(
        "user={} timezone={} trend_days={} store={:?}",
        config.user,
        config.timezone.name(),
        config.trend_days,
        config.store
    );

    let mut store = open_store(&config.store)?;
    let tz = config.timezone.tz;
    let today = aggregate::local_date(&tz, Utc::now());

    match cli.cmd {
        Cmd::Add { text } => {
            let raw = utils::read_text_arg(text)?;
            match ingest::submit(store.as_mut(), &config.user, &raw, Utc::now()) {
                Ok(workouts) => {
                    print_json(&SubmissionResponse::new(workouts))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&ApiError::from(&e))?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Cmd::Day { date } => {
            let daily = DailyAggregator::new(tz);
            let date = date.unwrap_or(today);
            respond(aggregate::list_day(
                store.as_mut(),
                &daily,
                &config.user,
                date,
            ))
        }
        Cmd::Dashboard { date } => {
            let trend = TrendAggregator::new(tz, config.trend_days);
            let date = date.unwrap_or(today);
            respond(aggregate::dashboard(
                store.as_mut(),
                &trend,
                &config.user,
                date,
            ))
        }
    }
}

fn open_store(cfg: &StoreConfig) -> Result<Box<dyn WorkoutStore>> {
    Ok(match cfg {
        StoreConfig::Sqlite(path) => Box::new(
            SqliteStore::open(path)
                .with_context(|| format!("Opening SQLite DB: {}", path.display()))?,
        ),
        StoreConfig::Postgres(url) => Box::new(PgStore::connect(url)?),
    })
}

fn respond<T: Serialize>(result: Result<T, StoreError>) -> Result<ExitCode> {
    match result {
        Ok(body) => {
            print_json(&body)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(err = %e, "query failed");
            print_json(&ApiError::from(&e))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serializing response")?;
    println!("{out}");
    Ok(())
}
