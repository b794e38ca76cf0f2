use tracing::debug;

use crate::driver::Driver;
use crate::error::SqlConnError;
use crate::transaction::TransactionState;

use super::session::Connection;

impl<D: Driver> Connection<D> {
    /// Switch autocommit off and enter the active state.
    ///
    /// # Errors
    /// Returns `SqlConnError::TransactionAlreadyActive` if a transaction is running, or
    /// `SqlConnError::StatementExecutionError` if the driver refuses the mode switch.
    pub fn start_transaction(&mut self) -> Result<(), SqlConnError> {
        self.tx.ensure_can_begin()?;
        self.driver
            .set_autocommit(false)
            .map_err(SqlConnError::execution)?;
        self.tx = TransactionState::Active;
        debug!("transaction started");
        Ok(())
    }

    /// Commit, switch autocommit back on and return to idle.
    ///
    /// A failed commit leaves the transaction active so the caller can roll back.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoActiveTransaction` when idle, or
    /// `SqlConnError::StatementExecutionError` if the driver fails.
    pub fn commit_transaction(&mut self) -> Result<(), SqlConnError> {
        self.tx.ensure_can_finish()?;
        self.driver.commit().map_err(SqlConnError::execution)?;
        self.end_transaction()?;
        debug!("transaction committed");
        Ok(())
    }

    /// Roll back, switch autocommit back on and return to idle.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoActiveTransaction` when idle, or
    /// `SqlConnError::StatementExecutionError` if the driver fails.
    pub fn rollback_transaction(&mut self) -> Result<(), SqlConnError> {
        self.tx.ensure_can_finish()?;
        self.driver.rollback().map_err(SqlConnError::execution)?;
        self.end_transaction()?;
        debug!("transaction rolled back");
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), SqlConnError> {
        // Commit/rollback already succeeded; stay idle even if autocommit fails to switch.
        self.tx = TransactionState::Idle;
        self.driver
            .set_autocommit(true)
            .map_err(SqlConnError::execution)
    }
}
