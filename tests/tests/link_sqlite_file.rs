//! Link synchronization against a file database that another connection
//! prepares first.
#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use std::path::Path;
use strata::{DatabaseDef, Dialect, Field, FieldTag, FieldType, Link, SchemaDef};
use tests::init_logging;

fn posts() -> SchemaDef {
    SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("title", FieldType::Text).tag(FieldTag::Nullable))
}

fn raw(path: &Path, sql: &str) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

async fn connect(path: &Path) -> Link {
    let dsn = format!("sqlite://{}", path.display());
    Link::connect(DatabaseDef::new("main", dsn, Dialect::Sqlite))
        .await
        .unwrap()
}

#[tokio::test]
async fn failed_create_is_retried_on_next_sync() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.db");

    // An index already owns the name the table needs.
    raw(
        &path,
        "CREATE TABLE other (x INTEGER); CREATE INDEX posts ON other (x);",
    );

    let link = connect(&path).await;

    let report = link.set_schemas(vec![posts()]).await.unwrap();
    assert_eq!(report.failed, vec!["posts".to_string()]);
    assert!(report.created.is_empty());
    assert!(!link.is_tracked("posts"));
    assert!(link.model("posts").unwrap_err().is_not_registered());

    raw(&path, "DROP INDEX posts;");

    let report = link.set_schemas(vec![posts()]).await.unwrap();
    assert_eq!(report.created, vec!["posts".to_string()]);
    assert!(report.failed.is_empty());
    assert!(link.model("posts").unwrap().all().await.unwrap().is_empty());

    link.close().await.unwrap();
}

#[tokio::test]
async fn first_sync_reports_tables_already_present() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.db");

    raw(&path, "CREATE TABLE posts (x INTEGER);");

    let link = connect(&path).await;
    let report = link.set_schemas(vec![posts()]).await.unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.existing, vec!["posts".to_string()]);
    assert!(link.is_tracked("posts"));

    link.close().await.unwrap();
}
