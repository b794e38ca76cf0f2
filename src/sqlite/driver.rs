use std::collections::VecDeque;

use rusqlite::ffi;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use tracing::debug;

use crate::config::ConnectOptions;
use crate::driver::{ColumnMeta, Driver};
use crate::error::DriverError;
use crate::types::RowValues;

use super::params::convert_params;
use super::query::sqlite_extract_row;

const UTF8_ALIASES: &[&str] = &["utf8", "utf8mb4", "utf-8"];

/// `SQLite` session behind the [`Driver`] trait.
///
/// `database` names the file to open; an empty name or `:memory:` opens a private
/// in-memory database. Network options are accepted and ignored.
///
/// Results are not streamed: `execute` reads every row into memory, so stopping a
/// `fetch_iter`/`fetch_each` drain early saves no work on this driver.
///
/// With autocommit off, a transaction that `SQLite` ended on its own (an `OR ROLLBACK`
/// conflict, `SQLITE_FULL`, ...) is reopened before the next statement, the way a
/// server with `autocommit=0` starts a new one.
pub struct SqliteDriver {
    conn: rusqlite::Connection,
    autocommit: bool,
}

/// Statement state for [`SqliteDriver`].
///
/// The compiled statement lives in rusqlite's statement cache; this handle carries the
/// SQL, the bound values and, after execution, the fully buffered result.
#[derive(Debug)]
pub struct SqliteStatement {
    sql: String,
    columns: Vec<ColumnMeta>,
    param_count: usize,
    params: Vec<Value>,
    rows: VecDeque<Vec<RowValues>>,
    stored: u64,
    affected: u64,
}

impl SqliteDriver {
    /// Wrap an existing rusqlite connection.
    #[must_use]
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self {
            conn,
            autocommit: true,
        }
    }

    /// Run one or more statements without binding, outside the statement slot.
    ///
    /// # Errors
    /// Returns `DriverError` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DriverError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

impl Driver for SqliteDriver {
    type Statement = SqliteStatement;

    fn connect(options: &ConnectOptions) -> Result<Self, DriverError> {
        let charset = options.charset.to_ascii_lowercase();
        if !UTF8_ALIASES.contains(&charset.as_str()) {
            return Err(DriverError::new(
                ffi::SQLITE_MISUSE,
                format!("unsupported charset '{}'", options.charset),
            ));
        }
        let conn = match options.database.as_str() {
            "" | ":memory:" => rusqlite::Connection::open_in_memory()?,
            path => rusqlite::Connection::open(path)?,
        };
        debug!(database = %options.database, "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    fn prepare(&mut self, sql: &str) -> Result<SqliteStatement, DriverError> {
        let stmt = self.conn.prepare_cached(sql)?;
        let columns = stmt
            .columns()
            .iter()
            .map(|c| ColumnMeta::new(c.name(), c.decl_type()))
            .collect();
        Ok(SqliteStatement {
            sql: sql.to_owned(),
            columns,
            param_count: stmt.parameter_count(),
            params: Vec::new(),
            rows: VecDeque::new(),
            stored: 0,
            affected: 0,
        })
    }

    fn bind(
        &mut self,
        stmt: &mut SqliteStatement,
        types: &str,
        values: Vec<RowValues>,
    ) -> Result<(), DriverError> {
        if values.len() != stmt.param_count {
            return Err(DriverError::new(
                ffi::SQLITE_RANGE,
                format!(
                    "statement expects {} parameters, {} bound",
                    stmt.param_count,
                    values.len()
                ),
            ));
        }
        stmt.params = convert_params(types, values)?;
        Ok(())
    }

    fn execute(&mut self, stmt: &mut SqliteStatement) -> Result<(), DriverError> {
        if stmt.params.len() != stmt.param_count {
            return Err(DriverError::new(
                ffi::SQLITE_RANGE,
                format!("no data supplied for {} parameters", stmt.param_count),
            ));
        }
        if !self.autocommit && self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        let mut prepared = self.conn.prepare_cached(&stmt.sql)?;
        stmt.rows.clear();
        if stmt.columns.is_empty() {
            let changed = prepared.execute(params_from_iter(stmt.params.iter()))?;
            stmt.affected = changed as u64;
        } else {
            let width = stmt.columns.len();
            let mut rows = prepared.query(params_from_iter(stmt.params.iter()))?;
            while let Some(row) = rows.next()? {
                stmt.rows.push_back(sqlite_extract_row(row, width)?);
            }
            // mysqli reports the row count of a SELECT as its affected rows.
            stmt.affected = stmt.rows.len() as u64;
        }
        stmt.stored = stmt.rows.len() as u64;
        Ok(())
    }

    fn result_metadata(&self, stmt: &SqliteStatement) -> Result<Vec<ColumnMeta>, DriverError> {
        Ok(stmt.columns.clone())
    }

    fn fetch(&mut self, stmt: &mut SqliteStatement) -> Result<Option<Vec<RowValues>>, DriverError> {
        Ok(stmt.rows.pop_front())
    }

    fn store_result(&mut self, stmt: &mut SqliteStatement) -> Result<u64, DriverError> {
        Ok(stmt.stored)
    }

    fn affected_rows(&self, stmt: &SqliteStatement) -> u64 {
        stmt.affected
    }

    fn close_statement(&mut self, stmt: SqliteStatement) {
        drop(stmt);
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError> {
        if enabled && !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        } else if !enabled && self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        self.autocommit = enabled;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        if !self.autocommit {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        if !self.autocommit {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn escape(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    fn close(self) -> Result<(), DriverError> {
        self.conn.close().map_err(|(_, err)| DriverError::from(err))
    }
}
