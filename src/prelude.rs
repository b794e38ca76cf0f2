//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::bind_args;
pub use crate::config::{ConnectOptions, ConnectOptionsBuilder, ErrorPolicy};
pub use crate::connection::{Connection, Rows};
pub use crate::driver::{ColumnMeta, Driver};
pub use crate::error::{DriverError, SqlConnError};
pub use crate::results::ResultRow;
pub use crate::transaction::TransactionState;
pub use crate::types::{BindArg, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteDriver};
