pub mod character;
pub mod error;
pub mod franchise;
pub mod movie;
mod relation;
pub mod sample;

use std::{collections::HashSet, fmt::Display, str::FromStr};

pub use error::Error;
pub use sqlx::Error as SqlxError;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type ChosenConnection = sqlx::SqliteConnection;
pub type Pool = sqlx::Pool<ChosenDB>;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Applies embedded schema migrations.
pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Character,
    Movie,
    Franchise,
}

impl EntityKind {
    pub(crate) fn table(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Movie => "movie",
            EntityKind::Franchise => "franchise",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Character => write!(f, "Character"),
            EntityKind::Movie => write!(f, "Movie"),
            EntityKind::Franchise => write!(f, "Franchise"),
        }
    }
}

pub(crate) async fn exists<'c, E>(kind: EntityKind, id: i64, executor: E) -> Result<bool>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", kind.table());
    let found: bool = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found)
}

pub(crate) async fn ensure_exists<'c, E>(kind: EntityKind, id: i64, executor: E) -> Result<()>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    if exists(kind, id, executor).await? {
        Ok(())
    } else {
        tracing::debug!("{kind} {id} does not exist");
        Err(Error::RecordNotFound { kind, id })
    }
}

/// Removes repeated ids, first occurrence wins.
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}
