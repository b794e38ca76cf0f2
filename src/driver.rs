//! The capability surface a database driver must expose.
//!
//! Everything above this trait (binding, result materialization, the transaction state
//! machine) is driver-agnostic. The crate ships a `SQLite` implementation behind the
//! `sqlite` feature; MySQL-style drivers map each method onto the matching mysqli call.

use crate::config::ConnectOptions;
use crate::error::DriverError;
use crate::types::RowValues;

/// Column name and declared type from a statement's result metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    pub decl_type: Option<String>,
}

impl ColumnMeta {
    #[must_use]
    pub fn new(name: impl Into<String>, decl_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            decl_type: decl_type.map(str::to_owned),
        }
    }
}

/// One blocking driver session.
///
/// Statement handles are plain values owned by the caller; every operation on them goes
/// through the session so that a driver may keep its own borrow of the connection.
pub trait Driver {
    type Statement;

    /// Open a session.
    ///
    /// # Errors
    /// Returns `DriverError` if the server cannot be reached or rejects the options.
    fn connect(options: &ConnectOptions) -> Result<Self, DriverError>
    where
        Self: Sized;

    /// # Errors
    /// Returns `DriverError` when the SQL is rejected.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DriverError>;

    /// Bind every placeholder in one call. `types` has one code character per value.
    ///
    /// # Errors
    /// Returns `DriverError` if the count or types do not fit the statement.
    fn bind(
        &mut self,
        stmt: &mut Self::Statement,
        types: &str,
        values: Vec<RowValues>,
    ) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` carrying the driver's error number on failure.
    fn execute(&mut self, stmt: &mut Self::Statement) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the statement has no result metadata available.
    fn result_metadata(&self, stmt: &Self::Statement) -> Result<Vec<ColumnMeta>, DriverError>;

    /// Next row, positionally aligned with [`Driver::result_metadata`].
    ///
    /// # Errors
    /// Returns `DriverError` if reading the row fails.
    fn fetch(&mut self, stmt: &mut Self::Statement) -> Result<Option<Vec<RowValues>>, DriverError>;

    /// Buffer the remaining result client-side and report its row count.
    ///
    /// # Errors
    /// Returns `DriverError` if the result cannot be buffered.
    fn store_result(&mut self, stmt: &mut Self::Statement) -> Result<u64, DriverError>;

    fn affected_rows(&self, stmt: &Self::Statement) -> u64;

    fn close_statement(&mut self, stmt: Self::Statement);

    /// # Errors
    /// Returns `DriverError` if the mode cannot be switched.
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the commit fails.
    fn commit(&mut self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the rollback fails.
    fn rollback(&mut self) -> Result<(), DriverError>;

    fn last_insert_id(&self) -> i64;

    /// Escape `value` for inclusion inside a quoted SQL literal.
    fn escape(&self, value: &str) -> String;

    /// # Errors
    /// Returns `DriverError` if the session does not shut down cleanly.
    fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}
