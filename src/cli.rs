use crate::aggregate::DEFAULT_TREND_DAYS;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "fitlog.db";
pub const DEFAULT_USER: &str = "local";

#[derive(Parser, Debug)]
#[command(
    name = "fitlog",
    about = "Log workouts from a compact text format and summarize the calories burned"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// SQLite database file
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// PostgreSQL connection URL; when set, used instead of --db
    #[arg(long, global = true)]
    pub pg_url: Option<String>,

    /// User the workouts belong to
    #[arg(long, global = true, default_value = DEFAULT_USER)]
    pub user: String,

    /// IANA time zone for day boundaries (e.g. Europe/Paris). Defaults to the system zone.
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Use UTC day boundaries
    #[arg(long, global = true, conflicts_with = "timezone")]
    pub utc: bool,

    /// Number of days in the calorie trend
    #[arg(long, global = true, default_value_t = DEFAULT_TREND_DAYS)]
    pub days: usize,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Add workouts. Blocks are separated by `;`, fields by newlines:
    /// `#Category`, `#Name`, `#3sets10reps`, `#50kg`, `#10min`.
    Add {
        /// Workout text; read from stdin when omitted or `-`
        text: Option<String>,
    },

    /// List the workouts of one day
    Day {
        /// Day to list (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Today's totals, category breakdown and calorie trend
    Dashboard {
        /// Reference day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}
