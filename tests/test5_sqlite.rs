#![cfg(feature = "sqlite")]

use std::ops::ControlFlow;

use fast_sql_conn::prelude::*;
use serde_json::json;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

fn users() -> Result<SqliteConnection, SqlConnError> {
    let mut conn = SqliteConnection::connect(&ConnectOptions::default())?;
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL, flags BLOB);
         INSERT INTO users (id, name, score) VALUES (7, 'Ann', 4.5);",
    )?;
    Ok(conn)
}

#[test]
fn select_by_id_returns_the_matching_row() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    conn.query("SELECT id, name FROM users WHERE id = ?", &bind_args![7])?;
    assert_eq!(conn.num_rows()?, 1);

    let row = conn.fetch_one()?;
    assert_eq!(serde_json::to_value(&row)?, json!({"id": 7, "name": "Ann"}));
    assert_eq!(conn.query_count(), 1);
    Ok(())
}

#[test]
fn column_metadata_carries_declared_types() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    conn.query("SELECT id, score FROM users", &[])?;
    let cols = conn.columns()?;
    assert_eq!(cols[0], ColumnMeta::new("id", Some("INTEGER")));
    assert_eq!(cols[1], ColumnMeta::new("score", Some("REAL")));
    conn.fetch_all()?;
    assert!(conn.columns().is_err());
    Ok(())
}

#[test]
fn sequences_fill_an_in_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    for (id, name) in [(1, "Bo"), (2, "Cy"), (3, "Di")] {
        conn.query(
            "INSERT INTO users (id, name) VALUES (?, ?)",
            &bind_args![id, name],
        )?;
    }
    let rows = conn
        .query(
            "SELECT name FROM users WHERE id IN (?, ?, ?) ORDER BY id",
            &bind_args![vec![3, 1, 7]],
        )?
        .fetch_all()?;
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.get("name").and_then(RowValues::as_text))
        .collect();
    assert_eq!(names, vec!["Bo", "Di", "Ann"]);
    Ok(())
}

#[test]
fn blob_and_bool_values_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    conn.query(
        "UPDATE users SET flags = ? WHERE id = ?",
        &bind_args![true, 7],
    )?;
    let row = conn
        .query("SELECT flags, score FROM users WHERE id = ?", &bind_args![7])?
        .fetch_one()?;
    assert_eq!(row.get("flags").and_then(RowValues::as_bool), Some(true));
    assert_eq!(row.get("score").and_then(RowValues::as_float), Some(4.5));

    conn.query(
        "UPDATE users SET flags = ? WHERE id = ?",
        &bind_args![RowValues::Blob(vec![0xde, 0xad]), 7],
    )?;
    let row = conn.query("SELECT flags FROM users", &[])?.fetch_one()?;
    assert_eq!(row.get("flags").and_then(RowValues::as_blob), Some(&[0xde, 0xad][..]));
    Ok(())
}

#[test]
fn dml_reports_affected_rows_and_insert_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    conn.query("INSERT INTO users (name) VALUES (?)", &bind_args!["Eve"])?;
    assert_eq!(conn.affected_rows(), 1);
    assert_eq!(conn.last_insert_id(), 8);

    conn.query("UPDATE users SET score = ?", &bind_args![1.0])?;
    assert_eq!(conn.affected_rows(), 2);
    Ok(())
}

#[test]
fn fetch_each_stop_leaves_connection_usable() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = SqliteConnection::connect(&ConnectOptions::default())?;
    conn.query(
        "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 5) SELECT x FROM n",
        &[],
    )?;
    let mut last = None;
    let processed = conn.fetch_each(|row| {
        last = row.get("x").cloned();
        if last == Some(RowValues::Int(2)) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    assert_eq!(processed, 2);
    assert!(!conn.has_open_statement());

    let row = conn.query("SELECT 'ok' AS status", &[])?.fetch_one()?;
    assert_eq!(row.get("status"), Some(&RowValues::Text("ok".into())));
    Ok(())
}

#[test]
fn rollback_discards_and_commit_persists() -> Result<(), Box<dyn std::error::Error>> {
    let path = unique_db_path("tx");
    let opts = ConnectOptions::new(path.clone());
    let mut conn = SqliteConnection::connect(&opts)?;
    conn.execute_batch("CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT);")?;

    conn.start_transaction()?;
    conn.query("INSERT INTO items (label) VALUES (?)", &bind_args!["dropped"])?;
    conn.rollback_transaction()?;

    conn.start_transaction()?;
    conn.query("INSERT INTO items (label) VALUES (?)", &bind_args!["kept"])?;
    conn.commit_transaction()?;
    conn.close()?;

    let mut reopened = SqliteConnection::connect(&opts)?;
    let rows = reopened.query("SELECT label FROM items", &[])?.fetch_all()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("label"), Some(&RowValues::Text("kept".into())));
    Ok(())
}

#[test]
fn constraint_violation_follows_transaction_rule() -> Result<(), Box<dyn std::error::Error>> {
    const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
    let mut conn = users()?;
    let insert = "INSERT INTO users (id, name) VALUES (?, ?)";

    let err = conn.query(insert, &bind_args![7, "dupe"]).unwrap_err();
    assert_eq!(err.code(), Some(SQLITE_CONSTRAINT_PRIMARYKEY));

    conn.start_transaction()?;
    conn.query(insert, &bind_args![7, "dupe"])?;
    conn.query(insert, &bind_args![8, "Gus"])?;
    assert_eq!(
        conn.last_error().and_then(SqlConnError::code),
        Some(SQLITE_CONSTRAINT_PRIMARYKEY)
    );
    conn.commit_transaction()?;

    let rows = conn.query("SELECT id FROM users ORDER BY id", &[])?.fetch_all()?;
    assert_eq!(rows.len(), 2);
    Ok(())
}

#[test]
fn rollback_after_swallowed_failure_discards_the_transaction()
-> Result<(), Box<dyn std::error::Error>> {
    const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
    let mut conn = users()?;

    conn.start_transaction()?;
    conn.query("INSERT INTO users (id, name) VALUES (?, ?)", &bind_args![8, "Gus"])?;
    // OR ROLLBACK makes SQLite end the transaction itself.
    conn.query(
        "INSERT OR ROLLBACK INTO users (id, name) VALUES (?, ?)",
        &bind_args![7, "dupe"],
    )?;
    assert_eq!(
        conn.last_error().and_then(SqlConnError::code),
        Some(SQLITE_CONSTRAINT_PRIMARYKEY)
    );
    conn.query("INSERT INTO users (id, name) VALUES (?, ?)", &bind_args![9, "Cy"])?;
    conn.rollback_transaction()?;

    let rows = conn.query("SELECT id FROM users ORDER BY id", &[])?.fetch_all()?;
    let ids: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.get("id").and_then(RowValues::as_int).copied())
        .collect();
    assert_eq!(ids, vec![7]);
    Ok(())
}

#[test]
fn syntax_and_parameter_errors() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    assert!(matches!(
        conn.query("SELEC 1", &[]),
        Err(SqlConnError::StatementPrepareError { .. })
    ));
    // Placeholder with nothing bound.
    assert!(matches!(
        conn.query("SELECT * FROM users WHERE id = ?", &[]),
        Err(SqlConnError::StatementExecutionError { .. })
    ));
    // Too many values for the placeholders.
    assert!(matches!(
        conn.query("SELECT * FROM users WHERE id = ?", &bind_args![1, 2]),
        Err(SqlConnError::StatementExecutionError { .. })
    ));
    assert_eq!(conn.query_count(), 0);
    Ok(())
}

#[test]
fn escaped_literal_survives_a_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = users()?;
    let name = conn.escape("O'Brien");
    conn.query(
        &format!("INSERT INTO users (id, name) VALUES (9, '{name}')"),
        &[],
    )?;
    let row = conn
        .query("SELECT name FROM users WHERE id = ?", &bind_args![9])?
        .fetch_one()?;
    assert_eq!(row.get("name"), Some(&RowValues::Text("O'Brien".into())));
    Ok(())
}

#[test]
fn non_utf8_charset_fails_to_connect() {
    let opts = ConnectOptions::builder().charset("latin1").finish();
    assert!(matches!(
        SqliteConnection::connect(&opts),
        Err(SqlConnError::ConnectionError(_))
    ));
}

#[test]
fn batch_failure_carries_the_sqlite_code() -> Result<(), Box<dyn std::error::Error>> {
    const SQLITE_ERROR: i32 = 1;
    let mut conn = users()?;
    let err = conn
        .execute_batch("CREATE TABLE users (id INTEGER)")
        .unwrap_err();
    assert!(matches!(err, SqlConnError::StatementExecutionError { .. }));
    assert_eq!(err.code(), Some(SQLITE_ERROR));
    Ok(())
}
