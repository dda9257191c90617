//! Repository layer: house/window data store contracts and SQLite
//! implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL details away from services and layout logic.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject malformed rows instead of masking them.
//! - Timestamps are stored as Unix epoch milliseconds.

use crate::db::DbError;
use crate::model::house::HouseValidationError;
use crate::model::window::WindowValidationError;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod house_repo;
pub mod window_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by house and window stores.
#[derive(Debug)]
pub enum RepoError {
    InvalidHouse(HouseValidationError),
    InvalidLetter(WindowValidationError),
    Db(DbError),
    /// No row with this id.
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHouse(err) => write!(f, "{err}"),
            Self::InvalidLetter(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHouse(err) => Some(err),
            Self::InvalidLetter(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<HouseValidationError> for RepoError {
    fn from(value: HouseValidationError) -> Self {
        Self::InvalidHouse(value)
    }
}

impl From<WindowValidationError> for RepoError {
    fn from(value: WindowValidationError) -> Self {
        Self::InvalidLetter(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Fails when `tables` are missing, i.e. the connection skipped migrations.
fn ensure_tables(conn: &Connection, tables: &[&str]) -> RepoResult<()> {
    for table in tables {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::InvalidData(format!(
                "table `{table}` is missing; open the connection through db::open_db"
            )));
        }
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn millis_to_datetime(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
