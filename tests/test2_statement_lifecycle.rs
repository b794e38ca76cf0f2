use fast_sql_conn::prelude::*;
use fast_sql_conn::test_utils::{DriverEvent, ScriptedDriver};

fn scripted(driver: ScriptedDriver) -> Connection<ScriptedDriver> {
    Connection::from_driver(driver, ErrorPolicy::FailFast)
}

#[test]
fn second_query_closes_the_first_before_preparing() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = scripted(ScriptedDriver::new().with_result(
        "SELECT id FROM a",
        &["id"],
        vec![vec![RowValues::Int(1)]],
    ));
    conn.query("SELECT id FROM a", &[])?;
    conn.query("SELECT id FROM b", &[])?;

    assert_eq!(
        conn.driver().events(),
        &[
            DriverEvent::Prepare("SELECT id FROM a".into()),
            DriverEvent::Execute("SELECT id FROM a".into()),
            DriverEvent::CloseStatement("SELECT id FROM a".into()),
            DriverEvent::Prepare("SELECT id FROM b".into()),
            DriverEvent::Execute("SELECT id FROM b".into()),
        ]
    );
    assert_eq!(conn.current_sql(), Some("SELECT id FROM b"));
    assert_eq!(conn.driver().fetch_count("SELECT id FROM a"), 0);
    Ok(())
}

#[test]
fn metadata_is_gone_once_the_statement_closes() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = scripted(ScriptedDriver::new().with_result(
        "SELECT id, name FROM users",
        &["id", "name"],
        vec![],
    ));
    conn.query("SELECT id, name FROM users", &[])?;
    let names: Vec<String> = conn.columns()?.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["id", "name"]);

    conn.fetch_all()?;
    assert!(matches!(conn.columns(), Err(SqlConnError::NoOpenStatement)));
    Ok(())
}

#[test]
fn query_count_tracks_executions_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = scripted(ScriptedDriver::new().with_result(
        "SELECT 1",
        &["1"],
        vec![vec![RowValues::Int(1)]],
    ));
    assert_eq!(conn.query_count(), 0);

    conn.query("SELECT 1", &[])?;
    assert_eq!(conn.query_count(), 1);
    conn.fetch_all()?;
    assert_eq!(conn.query_count(), 1);

    conn.query("SELECT 1", &[])?.fetch_one()?;
    conn.query("SELECT 1", &[])?;
    assert_eq!(conn.query_count(), 3);
    Ok(())
}

#[test]
fn prepare_failure_is_returned_and_not_counted() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = scripted(ScriptedDriver::new().fail_prepare(
        "SELEC 1",
        1064,
        "You have an error in your SQL syntax",
    ));
    conn.query("SELECT 1", &[])?;

    let err = conn.query("SELEC 1", &[]).unwrap_err();
    assert!(matches!(err, SqlConnError::StatementPrepareError { code: 1064, .. }));
    assert_eq!(conn.query_count(), 1);
    // The earlier statement was still closed on entry.
    assert!(!conn.has_open_statement());
    assert!(matches!(conn.fetch_all(), Err(SqlConnError::NoOpenStatement)));
    Ok(())
}

#[test]
fn failed_prepare_clears_the_previous_affected_count() -> Result<(), Box<dyn std::error::Error>> {
    let driver = ScriptedDriver::new()
        .with_affected("UPDATE t SET x = 1", 3)
        .fail_prepare("SELEC 1", 1064, "You have an error in your SQL syntax");
    let mut conn = Connection::from_driver(driver, ErrorPolicy::Suppress);

    conn.query("UPDATE t SET x = 1", &[])?;
    assert_eq!(conn.affected_rows(), 3);

    conn.query("SELEC 1", &[])?;
    assert_eq!(conn.affected_rows(), 0);
    assert_eq!(conn.last_error().and_then(SqlConnError::code), Some(1064));
    Ok(())
}

#[test]
fn accessors_pass_through_to_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = scripted(
        ScriptedDriver::new()
            .with_affected("UPDATE t SET x = 1", 3)
            .with_last_insert_id(42),
    );
    conn.query("UPDATE t SET x = 1", &[])?;
    assert_eq!(conn.affected_rows(), 3);
    assert_eq!(conn.last_insert_id(), 42);
    assert_eq!(conn.escape("O'Brien\n"), "O\\'Brien\\n");
    conn.close()?;
    Ok(())
}

#[test]
fn connect_failure_is_a_connection_error() {
    let opts = ConnectOptions::builder()
        .host(fast_sql_conn::test_utils::UNREACHABLE_HOST)
        .finish();
    let err = Connection::<ScriptedDriver>::connect(&opts).unwrap_err();
    match err {
        SqlConnError::ConnectionError(msg) => assert!(msg.contains("Can't connect")),
        other => panic!("unexpected error: {other:?}"),
    }

    let opts = ConnectOptions::builder().host("").finish();
    let err = Connection::<ScriptedDriver>::connect(&opts).unwrap_err();
    assert!(matches!(err, SqlConnError::ConfigError(_)));
}
