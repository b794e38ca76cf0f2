//! In-process driver for exercising the statement layer without a database.

mod scripted;

pub use scripted::{DriverEvent, ScriptedDriver, ScriptedStatement, UNREACHABLE_HOST};
