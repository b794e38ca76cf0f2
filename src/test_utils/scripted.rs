use std::collections::{HashMap, VecDeque};

use crate::config::ConnectOptions;
use crate::driver::{ColumnMeta, Driver};
use crate::error::DriverError;
use crate::types::RowValues;

/// Host name that makes [`ScriptedDriver::connect`] fail.
pub const UNREACHABLE_HOST: &str = "unreachable.invalid";

/// Every driver call, in the order the connection made it.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Prepare(String),
    Bind { types: String, values: Vec<RowValues> },
    Execute(String),
    Fetch(String),
    CloseStatement(String),
    Autocommit(bool),
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Default)]
struct ScriptedResult {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<RowValues>>,
    affected: u64,
}

/// Statement handle for [`ScriptedDriver`].
#[derive(Debug)]
pub struct ScriptedStatement {
    sql: String,
    result: ScriptedResult,
    pending: VecDeque<Vec<RowValues>>,
}

/// Driver that replays canned results and records what it was asked to do.
///
/// Unknown SQL prepares fine and returns no columns and no rows.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    results: HashMap<String, ScriptedResult>,
    prepare_failures: HashMap<String, DriverError>,
    execute_failures: HashMap<String, DriverError>,
    commit_failure: Option<DriverError>,
    events: Vec<DriverEvent>,
    last_insert_id: i64,
}

impl ScriptedDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with these columns and rows.
    #[must_use]
    pub fn with_result(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<RowValues>>) -> Self {
        let result = ScriptedResult {
            columns: columns.iter().map(|c| ColumnMeta::new(*c, None)).collect(),
            affected: rows.len() as u64,
            rows,
        };
        self.results.insert(sql.to_owned(), result);
        self
    }

    /// Report `affected` changed rows for a statement with no result set.
    #[must_use]
    pub fn with_affected(mut self, sql: &str, affected: u64) -> Self {
        self.results.insert(
            sql.to_owned(),
            ScriptedResult {
                affected,
                ..ScriptedResult::default()
            },
        );
        self
    }

    #[must_use]
    pub fn fail_prepare(mut self, sql: &str, code: i32, message: &str) -> Self {
        self.prepare_failures
            .insert(sql.to_owned(), DriverError::new(code, message));
        self
    }

    #[must_use]
    pub fn fail_execute(mut self, sql: &str, code: i32, message: &str) -> Self {
        self.execute_failures
            .insert(sql.to_owned(), DriverError::new(code, message));
        self
    }

    #[must_use]
    pub fn fail_commit(mut self, code: i32, message: &str) -> Self {
        self.commit_failure = Some(DriverError::new(code, message));
        self
    }

    #[must_use]
    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = id;
        self
    }

    #[must_use]
    pub fn events(&self) -> &[DriverEvent] {
        &self.events
    }

    /// Type strings passed to `bind`, in call order.
    #[must_use]
    pub fn bound_types(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DriverEvent::Bind { types, .. } => Some(types.as_str()),
                _ => None,
            })
            .collect()
    }

    /// How many rows were fetched for `sql` across all executions.
    #[must_use]
    pub fn fetch_count(&self, sql: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DriverEvent::Fetch(s) if s == sql))
            .count()
    }
}

impl Driver for ScriptedDriver {
    type Statement = ScriptedStatement;

    fn connect(options: &ConnectOptions) -> Result<Self, DriverError> {
        if options.host == UNREACHABLE_HOST {
            return Err(DriverError::new(
                2002,
                format!("Can't connect to server on '{}'", options.host),
            ));
        }
        Ok(Self::new())
    }

    fn prepare(&mut self, sql: &str) -> Result<ScriptedStatement, DriverError> {
        if let Some(err) = self.prepare_failures.get(sql) {
            return Err(err.clone());
        }
        self.events.push(DriverEvent::Prepare(sql.to_owned()));
        Ok(ScriptedStatement {
            sql: sql.to_owned(),
            result: self.results.get(sql).cloned().unwrap_or_default(),
            pending: VecDeque::new(),
        })
    }

    fn bind(
        &mut self,
        _stmt: &mut ScriptedStatement,
        types: &str,
        values: Vec<RowValues>,
    ) -> Result<(), DriverError> {
        self.events.push(DriverEvent::Bind {
            types: types.to_owned(),
            values,
        });
        Ok(())
    }

    fn execute(&mut self, stmt: &mut ScriptedStatement) -> Result<(), DriverError> {
        self.events.push(DriverEvent::Execute(stmt.sql.clone()));
        if let Some(err) = self.execute_failures.get(&stmt.sql) {
            return Err(err.clone());
        }
        stmt.pending = stmt.result.rows.iter().cloned().collect();
        Ok(())
    }

    fn result_metadata(&self, stmt: &ScriptedStatement) -> Result<Vec<ColumnMeta>, DriverError> {
        Ok(stmt.result.columns.clone())
    }

    fn fetch(&mut self, stmt: &mut ScriptedStatement) -> Result<Option<Vec<RowValues>>, DriverError> {
        let row = stmt.pending.pop_front();
        if row.is_some() {
            self.events.push(DriverEvent::Fetch(stmt.sql.clone()));
        }
        Ok(row)
    }

    fn store_result(&mut self, stmt: &mut ScriptedStatement) -> Result<u64, DriverError> {
        Ok(stmt.pending.len() as u64)
    }

    fn affected_rows(&self, stmt: &ScriptedStatement) -> u64 {
        stmt.result.affected
    }

    fn close_statement(&mut self, stmt: ScriptedStatement) {
        self.events.push(DriverEvent::CloseStatement(stmt.sql));
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.events.push(DriverEvent::Autocommit(enabled));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        if let Some(err) = &self.commit_failure {
            return Err(err.clone());
        }
        self.events.push(DriverEvent::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.events.push(DriverEvent::Rollback);
        Ok(())
    }

    fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    fn escape(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' | '\'' | '"' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                '\x1a' => escaped.push_str("\\Z"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    fn close(self) -> Result<(), DriverError> {
        Ok(())
    }
}
