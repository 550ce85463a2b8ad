//! SQLite data context bootstrap.
//!
//! # Responsibility
//! - Open and configure SQLite connections usable as a data context.
//! - Define the error type shared by SQL-backed query/command objects.
//!
//! # Invariants
//! - The caller owns returned connections; nothing here keeps a handle.
//! - Connections are fully configured before they are returned.
//!
//! # See also
//! - `crate::object::sql` for objects that execute against a `Connection`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    EmptyStatement,
    NoRowsAffected { sql: String },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::EmptyStatement => write!(f, "sql statement cannot be empty"),
            Self::NoRowsAffected { sql } => {
                write!(f, "statement changed no rows: {sql}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::EmptyStatement | Self::NoRowsAffected { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
