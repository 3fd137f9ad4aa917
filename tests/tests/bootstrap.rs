//! Startup against a SQLite bootstrap database.
#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use strata::{bootstrap, DatabaseDef, Dialect, Origin, StrataConfig};
use tests::{init_logging, record};

fn config(dir: &Path, seed_dir: Option<&Path>) -> StrataConfig {
    StrataConfig {
        system_dsn: format!("sqlite://{}", dir.join("system.db").display()),
        seed_dir: seed_dir.map(Path::to_path_buf),
        ..StrataConfig::default()
    }
}

fn write_seed(dir: &Path, file: &str, contents: serde_json::Value) {
    std::fs::write(dir.join(file), contents.to_string()).unwrap();
}

#[tokio::test]
async fn in_memory_bootstrap_creates_system_tables() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    let system = strata.links.find_by_name(DatabaseDef::SYSTEM).await.unwrap();
    assert!(system.is_tracked("Schema"));
    assert!(system.is_tracked("Database"));

    assert_eq!(
        strata.registry.origin(DatabaseDef::SYSTEM, "Schema").await,
        Some(Origin::Disk)
    );

    let databases = strata.databases.find_all().await.unwrap();
    assert_eq!(databases, vec![strata.databases.system().clone()]);
    assert_eq!(databases[0].ty, Dialect::Sqlite);

    strata.shutdown().await.unwrap();
}

#[tokio::test]
async fn unsupported_system_dsn_is_fatal() {
    let config = StrataConfig {
        system_dsn: "ftp://host/system".to_string(),
        ..StrataConfig::default()
    };

    let err = bootstrap(config).await.unwrap_err();
    assert!(err.is_unsupported_database_type());
}

#[tokio::test]
async fn seed_directory_is_registered_and_materialized() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let seeds = dir.path().join("seeds");
    std::fs::create_dir(&seeds).unwrap();

    write_seed(
        &seeds,
        "audit.json",
        json!([
            {
                "reference": "auditLog",
                "database": "system",
                "fields": [
                    { "reference": "id", "type": "INTEGER", "tags": ["PRIMARY"] },
                    { "reference": "message", "type": "TEXT" }
                ]
            },
            {
                "reference": "posts",
                "database": "main",
                "fields": [{ "reference": "id", "type": "UUID", "tags": ["PRIMARY"] }]
            }
        ]),
    );
    write_seed(
        &seeds,
        "broken.json",
        json!({
            "reference": "places",
            "database": "system",
            "fields": [{ "reference": "shape", "type": "GEOMETRY" }]
        }),
    );
    std::fs::write(seeds.join("notes.txt"), "not a seed").unwrap();
    std::fs::write(seeds.join("garbage.json"), "{ nope").unwrap();

    let strata = bootstrap(config(dir.path(), Some(&seeds))).await.unwrap();

    assert!(strata.registry.find_one("system", "auditLog").await.is_some());
    assert!(strata.registry.find_one("main", "posts").await.is_some());
    assert!(strata.registry.find_one("system", "places").await.is_none());

    let log = strata.registry.get_model("system", "auditLog").await.unwrap();
    let entry = log
        .create(record(json!({ "message": "booted" })))
        .await
        .unwrap();
    assert_eq!(entry["id"], json!(1));

    // `main` has no link yet.
    let err = strata.registry.get_model("main", "posts").await.unwrap_err();
    assert!(err.is_not_registered());

    strata.shutdown().await.unwrap();
}

#[tokio::test]
async fn persisted_definition_wins_over_seed_after_restart() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let seeds = dir.path().join("seeds");
    std::fs::create_dir(&seeds).unwrap();

    write_seed(
        &seeds,
        "posts.json",
        json!({
            "reference": "posts",
            "database": "main",
            "label": "from disk",
            "fields": [{ "reference": "id", "type": "UUID", "tags": ["PRIMARY"] }]
        }),
    );

    let strata = bootstrap(config(dir.path(), Some(&seeds))).await.unwrap();
    assert_eq!(strata.registry.origin("main", "posts").await, Some(Origin::Disk));

    let mut posts = strata.registry.find_one("main", "posts").await.unwrap();
    posts.label = Some("from database".to_string());
    strata.registry.persist(posts.clone()).await.unwrap();

    // Persisting twice replaces the stored row.
    strata.registry.persist(posts).await.unwrap();
    strata.shutdown().await.unwrap();

    let strata = bootstrap(config(dir.path(), Some(&seeds))).await.unwrap();

    let posts = strata.registry.find_one("main", "posts").await.unwrap();
    assert_eq!(posts.label.as_deref(), Some("from database"));
    assert_eq!(strata.registry.origin("main", "posts").await, Some(Origin::Database));

    let all = strata.registry.find_all().await.unwrap();
    assert_eq!(all.iter().filter(|s| s.reference == "posts").count(), 1);

    strata.shutdown().await.unwrap();
}

#[tokio::test]
async fn persist_updates_the_stored_row_in_place() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    let mut posts = strata::SchemaDef::new("main", "posts")
        .field(strata::Field::new("id", strata::FieldType::Uuid).tag(strata::FieldTag::Primary));
    posts.label = Some("first".to_string());
    strata.registry.persist(posts.clone()).await.unwrap();

    let rows = strata
        .links
        .find_by_name(DatabaseDef::SYSTEM)
        .await
        .unwrap()
        .model("Schema")
        .unwrap();
    let key = record(json!({ "database": "main", "reference": "posts" }));

    let before = rows.find(key.clone()).await.unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0]["label"], json!("first"));

    posts.label = None;
    strata.registry.persist(posts).await.unwrap();

    let after = rows.find(key).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0]["id"], before[0]["id"]);
    assert_eq!(after[0]["label"], json!(null));

    let cached = strata.registry.find_one("main", "posts").await.unwrap();
    assert_eq!(cached.label, None);

    strata.shutdown().await.unwrap();
}

#[tokio::test]
async fn stored_databases_connect_at_startup() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let strata = bootstrap(config(dir.path(), None)).await.unwrap();
    strata
        .databases
        .create(DatabaseDef::new("analytics", "sqlite::memory:", Dialect::Sqlite))
        .await
        .unwrap();
    strata
        .databases
        .create(DatabaseDef::new(
            "unreachable",
            "sqlite:///nonexistent-strata-dir/db.sqlite",
            Dialect::Sqlite,
        ))
        .await
        .unwrap();
    strata.shutdown().await.unwrap();

    let strata = bootstrap(config(dir.path(), None)).await.unwrap();

    assert!(strata.links.find_by_name("analytics").await.is_some());
    assert!(strata.links.find_by_name("unreachable").await.is_none());

    let names: Vec<_> = strata
        .databases
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|def| def.name)
        .collect();
    assert_eq!(names, vec!["system", "analytics", "unreachable"]);

    strata.shutdown().await.unwrap();
}

#[test]
fn config_from_toml() {
    let config = StrataConfig::from_toml(
        r#"
        system_dsn = "sqlite:///var/lib/strata/system.db"
        seed_dir = "/etc/strata/seeds"
        event_queue_capacity = 8
        "#,
    )
    .unwrap();

    assert_eq!(config.system_dsn, "sqlite:///var/lib/strata/system.db");
    assert_eq!(config.event_queue_capacity, 8);
}
