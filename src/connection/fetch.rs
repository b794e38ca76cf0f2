use std::ops::ControlFlow;

use tracing::debug;

use crate::driver::{ColumnMeta, Driver};
use crate::error::SqlConnError;
use crate::results::{ResultRow, RowShape};

use super::session::Connection;

/// Lazy drain of the open statement.
///
/// Finite and not restartable: the statement is closed once the rows run out, a fetch
/// fails, or the iterator is dropped early. Rows left behind are never read by the
/// caller; whether the driver already read them depends on the driver.
pub struct Rows<'c, D: Driver> {
    conn: &'c mut Connection<D>,
    shape: RowShape,
    done: bool,
}

impl<D: Driver> Rows<'_, D> {
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.shape.column_names().iter().map(String::as_str).collect()
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            self.conn.close_current_statement();
        }
    }
}

impl<D: Driver> Iterator for Rows<'_, D> {
    type Item = Result<ResultRow, SqlConnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let conn = &mut *self.conn;
        let Some(stmt) = conn.statement.as_mut() else {
            self.done = true;
            return None;
        };
        match conn.driver.fetch(&mut stmt.handle) {
            Ok(Some(values)) if values.len() == self.shape.width() => {
                Some(Ok(self.shape.row(values)))
            }
            Ok(Some(values)) => {
                let width = self.shape.width();
                self.finish();
                Some(Err(SqlConnError::ResultShapeError(format!(
                    "driver returned {} values for {width} columns",
                    values.len()
                ))))
            }
            Ok(None) => {
                self.finish();
                None
            }
            Err(err) => {
                self.finish();
                Some(Err(SqlConnError::execution(err)))
            }
        }
    }
}

impl<D: Driver> Drop for Rows<'_, D> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl<D: Driver> Connection<D> {
    /// Result metadata of the open statement.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoOpenStatement` once the statement has been drained or
    /// replaced, or `SqlConnError::StatementExecutionError` if the driver has no metadata.
    pub fn columns(&self) -> Result<Vec<ColumnMeta>, SqlConnError> {
        let stmt = self
            .statement
            .as_ref()
            .ok_or(SqlConnError::NoOpenStatement)?;
        self.driver
            .result_metadata(&stmt.handle)
            .map_err(SqlConnError::execution)
    }

    /// Start draining the open statement row by row.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoOpenStatement` if nothing is open. A metadata failure
    /// closes the statement and is returned as `SqlConnError::StatementExecutionError`.
    pub fn fetch_iter(&mut self) -> Result<Rows<'_, D>, SqlConnError> {
        let columns = match self.columns() {
            Ok(columns) => columns,
            Err(err) => {
                self.close_current_statement();
                return Err(err);
            }
        };
        debug!(columns = columns.len(), "draining statement");
        let shape = RowShape::new(columns.into_iter().map(|c| c.name).collect());
        Ok(Rows {
            conn: self,
            shape,
            done: false,
        })
    }

    /// Every remaining row, in driver order. Closes the statement.
    ///
    /// # Errors
    /// Returns `SqlConnError` if nothing is open or a fetch fails.
    pub fn fetch_all(&mut self) -> Result<Vec<ResultRow>, SqlConnError> {
        self.fetch_iter()?.collect()
    }

    /// Hand each row to `on_row` until it breaks or the rows run out. Closes the statement
    /// either way and returns how many rows were handed out.
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    /// use fast_sql_conn::prelude::*;
    ///
    /// # fn main() -> Result<(), SqlConnError> {
    /// let mut conn = SqliteConnection::connect(&ConnectOptions::default())?;
    /// conn.query("SELECT 1 AS n UNION ALL SELECT 2 UNION ALL SELECT 3", &[])?;
    /// let mut seen = Vec::new();
    /// let processed = conn.fetch_each(|row| {
    ///     seen.push(row.get("n").cloned());
    ///     if seen.len() == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// })?;
    /// assert_eq!(processed, 2);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `SqlConnError` if nothing is open or a fetch fails.
    pub fn fetch_each<F>(&mut self, mut on_row: F) -> Result<usize, SqlConnError>
    where
        F: FnMut(ResultRow) -> ControlFlow<()>,
    {
        let mut processed = 0;
        for row in self.fetch_iter()? {
            processed += 1;
            if on_row(row?).is_break() {
                break;
            }
        }
        Ok(processed)
    }

    /// The last row of the result, or an empty row when there are none.
    ///
    /// Every row is read and only the final one is kept.
    ///
    /// # Errors
    /// Returns `SqlConnError` if nothing is open or a fetch fails.
    pub fn fetch_one(&mut self) -> Result<ResultRow, SqlConnError> {
        let mut last = ResultRow::empty();
        for row in self.fetch_iter()? {
            last = row?;
        }
        Ok(last)
    }
}
