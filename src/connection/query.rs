use tracing::{debug, error, warn};

use crate::config::ErrorPolicy;
use crate::conversion::BoundParams;
use crate::driver::Driver;
use crate::error::{DriverError, SqlConnError};
use crate::types::BindArg;

use super::session::{Connection, OpenStatement};

impl<D: Driver> Connection<D> {
    /// Prepare, bind and execute `sql`, making it the connection's open statement.
    ///
    /// Any statement still open from a previous call is closed first. Arguments may be
    /// scalars or sequences; sequences are expanded in place before binding:
    /// ```rust
    /// use fast_sql_conn::prelude::*;
    ///
    /// # fn main() -> Result<(), SqlConnError> {
    /// let mut conn = SqliteConnection::connect(&ConnectOptions::default())?;
    /// conn.query("CREATE TABLE users (id INTEGER, name TEXT)", &[])?;
    /// conn.query("INSERT INTO users VALUES (?, ?)", &bind_args![7, "Ann"])?;
    /// let row = conn
    ///     .query("SELECT * FROM users WHERE id IN (?, ?)", &bind_args![vec![7, 8]])?
    ///     .fetch_one()?;
    /// assert_eq!(row.get("name"), Some(&RowValues::Text("Ann".into())));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Execution failures inside an active transaction are never returned; they are
    /// logged and kept in [`Connection::last_error`] so the caller can decide to roll back.
    ///
    /// # Errors
    /// Under [`ErrorPolicy::FailFast`]: `SqlConnError::StatementPrepareError` if the SQL is
    /// rejected, and `SqlConnError::StatementExecutionError` if binding or execution fails
    /// outside a transaction. Under [`ErrorPolicy::Suppress`] nothing is returned.
    pub fn query(&mut self, sql: &str, args: &[BindArg]) -> Result<&mut Self, SqlConnError> {
        self.close_current_statement();
        self.affected_rows = 0;

        let mut handle = match self.driver.prepare(sql) {
            Ok(handle) => handle,
            Err(err) => {
                debug!(sql, code = err.code, "prepare failed");
                self.report(SqlConnError::prepare(err))?;
                return Ok(self);
            }
        };

        if let Err(err) = self.bind_and_execute(&mut handle, args) {
            let err = SqlConnError::execution(err);
            if self.tx.is_active() {
                warn!(sql, error = %err, "statement failed inside transaction");
                self.last_error = Some(err);
            } else {
                match self.policy {
                    ErrorPolicy::FailFast => {
                        self.driver.close_statement(handle);
                        return Err(err);
                    }
                    ErrorPolicy::Suppress => {
                        error!(sql, error = %err, "suppressed database error");
                        self.last_error = Some(err);
                    }
                }
            }
        }

        self.affected_rows = self.driver.affected_rows(&handle);
        self.statement = Some(OpenStatement {
            handle,
            sql: sql.to_owned(),
        });
        self.query_count += 1;
        debug!(sql, query_count = self.query_count, "statement executed");
        Ok(self)
    }

    fn bind_and_execute(
        &mut self,
        handle: &mut D::Statement,
        args: &[BindArg],
    ) -> Result<(), DriverError> {
        if !args.is_empty() {
            let (types, values) = BoundParams::from_args(args).into_parts();
            self.driver.bind(handle, &types, values)?;
        }
        self.driver.execute(handle)
    }
}
