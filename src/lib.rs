//! Single-connection prepared statement layer.
//!
//! A [`Connection`] owns one driver session and at most one open statement. `query`
//! prepares, binds (inferring one type code per argument) and executes; the result is
//! then drained eagerly with [`Connection::fetch_all`], row by row with
//! [`Connection::fetch_each`] or [`Connection::fetch_iter`], or down to its last row with
//! [`Connection::fetch_one`]. Transactions toggle the driver's autocommit mode.
//!
//! ```rust
//! use fast_sql_conn::prelude::*;
//!
//! # fn main() -> Result<(), SqlConnError> {
//! let mut conn = SqliteConnection::connect(&ConnectOptions::default())?;
//! conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")?;
//!
//! conn.start_transaction()?;
//! conn.query("INSERT INTO users (id, name) VALUES (?, ?)", &bind_args![7, "Ann"])?;
//! conn.commit_transaction()?;
//!
//! let rows = conn.query("SELECT * FROM users WHERE id = ?", &bind_args![7])?.fetch_all()?;
//! assert_eq!(rows[0].get("name"), Some(&RowValues::Text("Ann".into())));
//! assert_eq!(conn.query_count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod conversion;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod results;
pub mod transaction;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConnectOptions, ConnectOptionsBuilder, ErrorPolicy};
pub use connection::{Connection, Rows};
pub use conversion::{BoundParams, TypeCode, flatten_args, infer_type};
pub use driver::{ColumnMeta, Driver};
pub use error::{DriverError, SqlConnError};
pub use results::ResultRow;
pub use transaction::TransactionState;
pub use types::{BindArg, RowValues};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteDriver};
