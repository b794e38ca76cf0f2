use thiserror::Error;

/// Failure reported by a driver primitive.
///
/// `code` is the driver's native error number (MySQL `errno`, `SQLite` extended result code,
/// ...). It is carried verbatim into [`SqlConnError`] so callers can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("driver error {code}: {message}")]
pub struct DriverError {
    pub code: i32,
    pub message: String,
}

impl DriverError {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(failure, _) => failure.extended_code,
            _ => rusqlite::ffi::SQLITE_ERROR,
        };
        DriverError::new(code, err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SqlConnError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unable to prepare statement (check your syntax) - {code}: {message}")]
    StatementPrepareError { code: i32, message: String },

    #[error("Unable to execute statement (check your params) - {code}: {message}")]
    StatementExecutionError { code: i32, message: String },

    #[error("Transaction already started")]
    TransactionAlreadyActive,

    #[error("Transaction not started. Call start_transaction to start a transaction")]
    NoActiveTransaction,

    #[error("No open statement; call query() first")]
    NoOpenStatement,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Result shape error: {0}")]
    ResultShapeError(String),
}

impl SqlConnError {
    pub(crate) fn prepare(err: DriverError) -> Self {
        SqlConnError::StatementPrepareError {
            code: err.code,
            message: err.message,
        }
    }

    pub(crate) fn execution(err: DriverError) -> Self {
        SqlConnError::StatementExecutionError {
            code: err.code,
            message: err.message,
        }
    }

    /// Driver error number carried by prepare/execute failures.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            SqlConnError::StatementPrepareError { code, .. }
            | SqlConnError::StatementExecutionError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SqlConnError {
    fn from(err: serde_json::Error) -> Self {
        SqlConnError::ConfigError(err.to_string())
    }
}
