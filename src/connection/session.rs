use std::fmt;

use tracing::{debug, error, warn};

use crate::config::{ConnectOptions, ErrorPolicy};
use crate::driver::Driver;
use crate::error::SqlConnError;
use crate::transaction::TransactionState;

/// The statement most recently executed by [`Connection::query`], not yet closed.
pub(crate) struct OpenStatement<S> {
    pub(crate) handle: S,
    pub(crate) sql: String,
}

/// One driver session plus the single statement slot layered on it.
///
/// Not `Sync` in spirit: every call takes `&mut self`, so sharing a connection across
/// threads requires external serialization. Use one connection per worker.
pub struct Connection<D: Driver> {
    pub(crate) driver: D,
    pub(crate) statement: Option<OpenStatement<D::Statement>>,
    pub(crate) query_count: u64,
    pub(crate) tx: TransactionState,
    pub(crate) policy: ErrorPolicy,
    pub(crate) last_error: Option<SqlConnError>,
    pub(crate) affected_rows: u64,
}

impl<D: Driver> Connection<D> {
    /// Open a driver session from `options`.
    ///
    /// # Errors
    /// Returns `SqlConnError::ConfigError` for invalid options and
    /// `SqlConnError::ConnectionError` if the driver cannot connect. Connect failures
    /// are returned whatever the error policy.
    pub fn connect(options: &ConnectOptions) -> Result<Self, SqlConnError> {
        options.validate()?;
        let driver = D::connect(options).map_err(|e| {
            SqlConnError::ConnectionError(format!(
                "Failed to connect to {}:{} - {e}",
                options.host, options.port
            ))
        })?;
        debug!(host = %options.host, database = %options.database, "connected");
        Ok(Self::from_driver(driver, options.error_policy))
    }

    /// Wrap an already open driver session.
    #[must_use]
    pub fn from_driver(driver: D, policy: ErrorPolicy) -> Self {
        Self {
            driver,
            statement: None,
            query_count: 0,
            tx: TransactionState::Idle,
            policy,
            last_error: None,
            affected_rows: 0,
        }
    }

    /// Statements successfully prepared and executed so far (swallowed failures included).
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.query_count
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.tx.is_active()
    }

    #[must_use]
    pub fn transaction_state(&self) -> TransactionState {
        self.tx
    }

    #[must_use]
    pub fn has_open_statement(&self) -> bool {
        self.statement.is_some()
    }

    /// SQL text of the open statement, if any.
    #[must_use]
    pub fn current_sql(&self) -> Option<&str> {
        self.statement.as_ref().map(|stmt| stmt.sql.as_str())
    }

    #[must_use]
    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn set_error_policy(&mut self, policy: ErrorPolicy) {
        self.policy = policy;
    }

    /// The most recent failure that was logged instead of returned.
    #[must_use]
    pub fn last_error(&self) -> Option<&SqlConnError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<SqlConnError> {
        self.last_error.take()
    }

    /// Read access to the underlying session.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Buffer the open statement's result and return its row count.
    ///
    /// Only meaningful before the rows are drained.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoOpenStatement` if nothing is open, or
    /// `SqlConnError::StatementExecutionError` if the driver cannot buffer the result.
    pub fn num_rows(&mut self) -> Result<u64, SqlConnError> {
        let stmt = self
            .statement
            .as_mut()
            .ok_or(SqlConnError::NoOpenStatement)?;
        self.driver
            .store_result(&mut stmt.handle)
            .map_err(SqlConnError::execution)
    }

    /// Rows changed by the last executed statement.
    #[must_use]
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.driver.last_insert_id()
    }

    /// Escape a string for use inside a quoted literal. Prefer bound parameters.
    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        self.driver.escape(value)
    }

    /// Close the open statement, abandon any running transaction, and end the session.
    ///
    /// # Errors
    /// Returns `SqlConnError::ConnectionError` if the rollback or the driver shutdown fails.
    pub fn close(mut self) -> Result<(), SqlConnError> {
        self.close_current_statement();
        if self.tx.is_active() {
            warn!("closing connection with an active transaction; rolling back");
            self.driver.rollback().map_err(|e| {
                SqlConnError::ConnectionError(format!("rollback on close failed - {e}"))
            })?;
            self.tx = TransactionState::Idle;
        }
        debug!(query_count = self.query_count, "closing connection");
        self.driver
            .close()
            .map_err(|e| SqlConnError::ConnectionError(e.to_string()))
    }

    pub(crate) fn close_current_statement(&mut self) {
        if let Some(stmt) = self.statement.take() {
            debug!(sql = %stmt.sql, "closing statement");
            self.driver.close_statement(stmt.handle);
        }
    }

    /// Apply the error policy: return the error, or log and remember it.
    pub(crate) fn report(&mut self, err: SqlConnError) -> Result<(), SqlConnError> {
        match self.policy {
            ErrorPolicy::FailFast => Err(err),
            ErrorPolicy::Suppress => {
                error!(error = %err, "suppressed database error");
                self.last_error = Some(err);
                Ok(())
            }
        }
    }
}

impl<D: Driver> fmt::Debug for Connection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("current_sql", &self.current_sql())
            .field("query_count", &self.query_count)
            .field("tx", &self.tx)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
