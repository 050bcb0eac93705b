use crate::error::StoreError;
use crate::store::WorkoutStore;
use crate::types::{StoredId, UserId, WorkoutEntry};
use chrono::{DateTime, Utc};
use postgres::{Client, NoTls, Row};

// SQLSTATE codes.
const INVALID_CATALOG_NAME: &str = "3D000";
const DUPLICATE_DATABASE: &str = "42P04";

/// PostgreSQL-backed store.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Connect to `pg_url`, creating the database if needed, and make sure
    /// the schema exists.
    pub fn connect(pg_url: &str) -> Result<Self, StoreError> {
        let mut client = connect_or_create_db(pg_url)?;
        ensure_pg_schema(&mut client)?;
        Ok(Self { client })
    }
}

fn setup(step: &'static str) -> impl FnOnce(postgres::Error) -> StoreError {
    move |source| StoreError::Setup { step, source }
}

fn has_sqlstate(e: &postgres::Error, code: &str) -> bool {
    e.as_db_error().is_some_and(|d| d.code().code() == code)
}

/// Connect to `pg_url`; when its database is missing, create it through the
/// `postgres` (or `template1`) maintenance database and connect again.
///
/// Creating requires the CREATE DATABASE privilege.
fn connect_or_create_db(pg_url: &str) -> Result<Client, StoreError> {
    match Client::connect(pg_url, NoTls) {
        Ok(client) => return Ok(client),
        Err(e) if has_sqlstate(&e, INVALID_CATALOG_NAME) => {
            tracing::warn!(err = %e, "database does not exist; attempting to create it");
        }
        Err(e) => return Err(setup("Connecting to PostgreSQL")(e)),
    }

    let target = MaintenanceUrls::from_pg_url(pg_url)?;

    let mut admin = Client::connect(&target.postgres, NoTls)
        .or_else(|_| Client::connect(&target.template1, NoTls))
        .map_err(setup("Connecting to maintenance DB (postgres/template1)"))?;

    let exists = admin
        .query_opt(
            "SELECT 1 FROM pg_database WHERE datname = $1",
            &[&target.db_name],
        )
        .map_err(setup("Checking pg_database"))?
        .is_some();

    if exists {
        tracing::info!(db = %target.db_name, "database already exists");
    } else {
        tracing::info!(db = %target.db_name, "creating database");
        create_database(&mut admin, &target.db_name)?;
    }

    Client::connect(pg_url, NoTls).map_err(setup("Connecting to PostgreSQL after creating database"))
}

/// Only plain identifiers are accepted, since the name is spliced into SQL.
fn is_safe_db_name(db_name: &str) -> bool {
    !db_name.is_empty()
        && db_name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn create_database(admin: &mut Client, db_name: &str) -> Result<(), StoreError> {
    if !is_safe_db_name(db_name) {
        return Err(StoreError::InvalidUrl(format!(
            "refusing to create database with unsafe name {db_name:?}"
        )));
    }

    // CREATE DATABASE has no IF NOT EXISTS; another client may win the race.
    match admin.batch_execute(&format!("CREATE DATABASE \"{db_name}\"")) {
        Err(e) if !has_sqlstate(&e, DUPLICATE_DATABASE) => Err(setup("Creating database")(e)),
        _ => Ok(()),
    }
}

/// Target database name plus the two maintenance URLs on the same server.
#[derive(Debug, PartialEq, Eq)]
struct MaintenanceUrls {
    db_name: String,
    postgres: String,
    template1: String,
}

impl MaintenanceUrls {
    /// Swap the database segment of a URI-style URL such as
    /// `postgres://127.0.0.1:5432/fitlog?sslmode=disable`, keeping the query.
    fn from_pg_url(pg_url: &str) -> Result<Self, StoreError> {
        let (base, query) = pg_url
            .split_once('?')
            .unwrap_or((pg_url, ""));

        let (prefix, db_name) = base
            .rsplit_once('/')
            .filter(|(_, name)| !name.is_empty())
            .ok_or_else(|| {
                StoreError::InvalidUrl("pg_url must include a database name (e.g. .../fitlog)".into())
            })?;

        let with = |name: &str| {
            if query.is_empty() {
                format!("{prefix}/{name}")
            } else {
                format!("{prefix}/{name}?{query}")
            }
        };

        Ok(Self {
            db_name: db_name.to_string(),
            postgres: with("postgres"),
            template1: with("template1"),
        })
    }
}

fn ensure_pg_schema(pg: &mut Client) -> Result<(), StoreError> {
    pg.batch_execute(
        r"
        CREATE TABLE IF NOT EXISTS workouts (
          id               bigserial PRIMARY KEY,
          user_id          text NOT NULL,
          category         text NOT NULL,
          workout_name     text NOT NULL,
          sets             bigint NOT NULL,
          reps             bigint NOT NULL,
          weight           double precision NOT NULL,
          duration         double precision NOT NULL,
          calories_burned  double precision NOT NULL,
          date             timestamptz NOT NULL,
          created_at       timestamptz NOT NULL DEFAULT now()
        );

        CREATE INDEX IF NOT EXISTS workouts_user_date_idx ON workouts (user_id, date);
        ",
    )
    .map_err(setup("Ensuring PostgreSQL schema"))
}

fn count_from_row(row: &Row, idx: usize, id: i64) -> Result<u32, StoreError> {
    let v: i64 = row.try_get(idx)?;
    u32::try_from(v).map_err(|_| StoreError::Corrupt(format!("workout {id} has count {v}")))
}

impl WorkoutStore for PgStore {
    fn insert(&mut self, e: &WorkoutEntry) -> Result<StoredId, StoreError> {
        let row = self.client.query_one(
            r"
            INSERT INTO workouts (
              user_id, category, workout_name,
              sets, reps, weight, duration,
              calories_burned, date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
            &[
                &e.user.as_str(),
                &e.category,
                &e.workout_name,
                &i64::from(e.sets),
                &i64::from(e.reps),
                &e.weight,
                &e.duration,
                &e.calories_burned,
                &e.date,
            ],
        )?;
        Ok(row.try_get(0)?)
    }

    fn query_range(
        &mut self,
        user: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEntry>, StoreError> {
        let rows = self.client.query(
            r"
            SELECT id, category, workout_name, sets, reps,
                   weight, duration, calories_burned, date
            FROM workouts
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ",
            &[&user.as_str(), &start, &end],
        )?;

        rows.iter()
            .map(|row| -> Result<WorkoutEntry, StoreError> {
                let id: i64 = row.try_get(0)?;
                Ok(WorkoutEntry {
                    category: row.try_get(1)?,
                    workout_name: row.try_get(2)?,
                    sets: count_from_row(row, 3, id)?,
                    reps: count_from_row(row, 4, id)?,
                    weight: row.try_get(5)?,
                    duration: row.try_get(6)?,
                    calories_burned: row.try_get(7)?,
                    user: user.clone(),
                    date: row.try_get(8)?,
                })
            })
            .collect()
    }
}
