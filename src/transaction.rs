use crate::error::SqlConnError;

/// Whether the connection currently has autocommit switched off for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    Idle,
    Active,
}

impl TransactionState {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, TransactionState::Active)
    }

    /// Check that a transaction may start. Does not change state.
    ///
    /// # Errors
    /// Returns `SqlConnError::TransactionAlreadyActive` if one is already running.
    pub fn ensure_can_begin(self) -> Result<(), SqlConnError> {
        match self {
            TransactionState::Idle => Ok(()),
            TransactionState::Active => Err(SqlConnError::TransactionAlreadyActive),
        }
    }

    /// Check that there is a transaction to commit or roll back. Does not change state.
    ///
    /// # Errors
    /// Returns `SqlConnError::NoActiveTransaction` when idle.
    pub fn ensure_can_finish(self) -> Result<(), SqlConnError> {
        match self {
            TransactionState::Active => Ok(()),
            TransactionState::Idle => Err(SqlConnError::NoActiveTransaction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_can_only_begin() {
        let state = TransactionState::default();
        assert!(!state.is_active());
        assert!(state.ensure_can_begin().is_ok());
        assert!(matches!(
            state.ensure_can_finish(),
            Err(SqlConnError::NoActiveTransaction)
        ));
    }

    #[test]
    fn active_can_only_finish() {
        let state = TransactionState::Active;
        assert!(matches!(
            state.ensure_can_begin(),
            Err(SqlConnError::TransactionAlreadyActive)
        ));
        assert!(state.ensure_can_finish().is_ok());
    }
}
