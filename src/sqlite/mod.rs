//! Bundled `SQLite` driver built on rusqlite.

pub mod driver;
pub mod params;
pub mod query;

pub use driver::{SqliteDriver, SqliteStatement};

/// A [`Connection`](crate::Connection) over the bundled `SQLite` driver.
pub type SqliteConnection = crate::Connection<SqliteDriver>;

impl SqliteConnection {
    /// Run a batch of statements (DDL, fixtures) without touching the statement slot or
    /// the query counter.
    ///
    /// # Errors
    /// Returns `SqlConnError::StatementExecutionError` if any statement fails.
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), crate::SqlConnError> {
        self.driver
            .execute_batch(sql)
            .map_err(crate::SqlConnError::execution)
    }
}
