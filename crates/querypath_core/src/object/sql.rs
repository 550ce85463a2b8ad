//! SQL-backed query and command objects for a SQLite `Connection` context.
//!
//! # Responsibility
//! - Package one SQL statement plus positional parameters as a reusable object.
//! - Keep rusqlite statement handling out of repository callers.
//!
//! # Invariants
//! - Statement text is never empty; construction rejects blank SQL.
//! - Parameters bind positionally in the order they were added.
//! - Each `execute` prepares and runs the statement once; no result caching.

use crate::db::{DbError, DbResult};
use crate::object::{Command, Query, ScalarQuery};
use rusqlite::types::{FromSql, Value};
use rusqlite::{params_from_iter, Connection, Row};
use std::marker::PhantomData;

#[derive(Debug, Clone)]
struct BoundSql {
    sql: String,
    params: Vec<Value>,
}

impl BoundSql {
    fn new(sql: impl Into<String>) -> DbResult<Self> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(DbError::EmptyStatement);
        }
        Ok(Self {
            sql,
            params: Vec::new(),
        })
    }

    fn push(&mut self, value: impl Into<Value>) {
        self.params.push(value.into());
    }
}

/// Reads column 0 of the first row returned by one statement.
///
/// Rows after the first are ignored. Fails with
/// `rusqlite::Error::QueryReturnedNoRows` (wrapped in `DbError`) when the
/// statement yields nothing.
#[derive(Debug)]
pub struct SqlScalar<T> {
    stmt: BoundSql,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromSql> SqlScalar<T> {
    pub fn new(sql: impl Into<String>) -> DbResult<Self> {
        Ok(Self {
            stmt: BoundSql::new(sql)?,
            _marker: PhantomData,
        })
    }

    /// Appends the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.stmt.push(value);
        self
    }

    pub fn sql(&self) -> &str {
        &self.stmt.sql
    }
}

impl<T> Clone for SqlScalar<T> {
    fn clone(&self) -> Self {
        Self {
            stmt: self.stmt.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: FromSql> ScalarQuery<Connection> for SqlScalar<T> {
    type Output = T;
    type Error = DbError;

    fn execute(&self, context: &Connection) -> DbResult<T> {
        let value = context.query_row(
            &self.stmt.sql,
            params_from_iter(self.stmt.params.iter()),
            |row| row.get(0),
        )?;
        Ok(value)
    }
}

/// Maps every row of one statement into an entity, in statement order.
///
/// Rows are materialized before returning because a prepared statement cannot
/// outlive the call that created it.
pub struct SqlQuery<F, T> {
    stmt: BoundSql,
    map_row: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> SqlQuery<F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    pub fn new(sql: impl Into<String>, map_row: F) -> DbResult<Self> {
        Ok(Self {
            stmt: BoundSql::new(sql)?,
            map_row,
            _marker: PhantomData,
        })
    }

    /// Appends the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.stmt.push(value);
        self
    }

    pub fn sql(&self) -> &str {
        &self.stmt.sql
    }
}

impl<F, T> Query<Connection> for SqlQuery<F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    type Entity = T;
    type Error = DbError;
    type Iter<'ctx> = std::vec::IntoIter<T>
    where
        Self: 'ctx;

    fn execute<'ctx>(&'ctx self, context: &'ctx Connection) -> DbResult<Self::Iter<'ctx>> {
        let mut stmt = context.prepare(&self.stmt.sql)?;
        let rows = stmt.query_map(params_from_iter(self.stmt.params.iter()), &self.map_row)?;
        let entities = rows.collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(entities.into_iter())
    }
}

impl<F: Clone, T> Clone for SqlQuery<F, T> {
    fn clone(&self) -> Self {
        Self {
            stmt: self.stmt.clone(),
            map_row: self.map_row.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, T> std::fmt::Debug for SqlQuery<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlQuery")
            .field("sql", &self.stmt.sql)
            .field("params", &self.stmt.params)
            .finish_non_exhaustive()
    }
}

/// Runs one mutating statement.
#[derive(Debug, Clone)]
pub struct SqlCommand {
    stmt: BoundSql,
    expect_changes: bool,
}

impl SqlCommand {
    pub fn new(sql: impl Into<String>) -> DbResult<Self> {
        Ok(Self {
            stmt: BoundSql::new(sql)?,
            expect_changes: false,
        })
    }

    /// Appends the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.stmt.push(value);
        self
    }

    /// Makes `execute` fail with `DbError::NoRowsAffected` when nothing changed.
    pub fn expect_changes(mut self) -> Self {
        self.expect_changes = true;
        self
    }

    pub fn sql(&self) -> &str {
        &self.stmt.sql
    }
}

impl Command<Connection> for SqlCommand {
    type Error = DbError;

    fn execute(&self, context: &Connection) -> DbResult<()> {
        let changed = context.execute(&self.stmt.sql, params_from_iter(self.stmt.params.iter()))?;
        if self.expect_changes && changed == 0 {
            return Err(DbError::NoRowsAffected {
                sql: self.stmt.sql.clone(),
            });
        }
        Ok(())
    }
}
