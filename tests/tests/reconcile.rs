//! Reaction to schema and database events.
#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use serde_json::json;
use strata::{
    bootstrap, DatabaseDef, Dialect, Event, Field, FieldTag, FieldType, Origin, SchemaDef,
    StrataConfig,
};
use tests::{init_logging, record};

fn main_db() -> DatabaseDef {
    DatabaseDef::new("main", "sqlite::memory:", Dialect::Sqlite)
}

fn posts() -> SchemaDef {
    SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("title", FieldType::Text).tag(FieldTag::Nullable))
}

#[tokio::test]
async fn events_apply_in_order_per_database() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    let updated = posts().field(Field::new("views", FieldType::Integer).tag(FieldTag::Nullable));

    strata.reconciler.send(Event::DatabaseCreated(main_db())).await.unwrap();
    strata.reconciler.send(Event::SchemaCreated(posts())).await.unwrap();
    strata.reconciler.send(Event::SchemaUpdated(updated)).await.unwrap();

    let strata::Strata {
        registry,
        links,
        reconciler,
        ..
    } = strata;
    reconciler.shutdown().await;

    let link = links.find_by_name("main").await.unwrap();
    assert!(link.is_tracked("posts"));
    assert_eq!(registry.origin("main", "posts").await, Some(Origin::Database));

    let posts = registry.get_model("main", "posts").await.unwrap();
    let created = posts
        .create(record(json!({ "title": "hi", "views": 3 })))
        .await
        .unwrap();
    assert_eq!(created["views"], json!(3));
}

#[tokio::test]
async fn schema_for_unconnected_database_is_only_registered() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    strata.reconciler.send(Event::SchemaCreated(posts())).await.unwrap();

    let strata::Strata {
        registry,
        links,
        reconciler,
        ..
    } = strata;
    reconciler.shutdown().await;

    assert!(registry.find_one("main", "posts").await.is_some());
    assert!(links.find_by_name("main").await.is_none());
}

#[tokio::test]
async fn database_created_discovers_existing_tables() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let dsn = format!("sqlite://{}", dir.path().join("legacy.db").display());

    // A table that predates the platform.
    {
        let legacy = strata::Link::connect(DatabaseDef::new("legacy", &dsn, Dialect::Sqlite))
            .await
            .unwrap();
        let table = SchemaDef::new("legacy", "invoices")
            .field(Field::new("id", FieldType::Integer).tag(FieldTag::Primary))
            .field(Field::new("total", FieldType::Double));
        legacy.set_schemas(vec![table]).await.unwrap();
        legacy.close().await.unwrap();
    }

    let strata = bootstrap(StrataConfig::default()).await.unwrap();
    strata
        .reconciler
        .send(Event::DatabaseCreated(DatabaseDef::new("legacy", &dsn, Dialect::Sqlite)))
        .await
        .unwrap();

    let strata::Strata {
        registry,
        links,
        reconciler,
        ..
    } = strata;
    reconciler.shutdown().await;

    let invoices = registry.find_one("legacy", "invoices").await.unwrap();
    assert!(invoices.has_tag(strata::TAG_IMPORTED));

    let link = links.find_by_name("legacy").await.unwrap();
    assert!(link.is_tracked("invoices"));
}

#[tokio::test]
async fn failed_reaction_does_not_stop_the_worker() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    let broken = DatabaseDef::new(
        "main",
        "sqlite:///nonexistent-strata-dir/db.sqlite",
        Dialect::Sqlite,
    );

    strata.reconciler.send(Event::DatabaseCreated(broken)).await.unwrap();
    strata.reconciler.send(Event::DatabaseCreated(main_db())).await.unwrap();
    strata.reconciler.send(Event::SchemaCreated(posts())).await.unwrap();

    let strata::Strata {
        links, reconciler, ..
    } = strata;
    reconciler.shutdown().await;

    let link = links.find_by_name("main").await.unwrap();
    assert!(link.is_tracked("posts"));
}

#[tokio::test]
async fn database_deleted_closes_the_link() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();

    strata.reconciler.send(Event::DatabaseCreated(main_db())).await.unwrap();
    strata.reconciler.send(Event::DatabaseDeleted("main".to_string())).await.unwrap();
    // Deleting an unknown database is a no-op.
    strata.reconciler.send(Event::DatabaseDeleted("ghost".to_string())).await.unwrap();

    let strata::Strata {
        links, reconciler, ..
    } = strata;
    reconciler.shutdown().await;

    assert!(links.find_by_name("main").await.is_none());
    assert!(links.find_by_name(DatabaseDef::SYSTEM).await.is_some());
}

#[test]
fn events_name_their_database() {
    assert_eq!(Event::SchemaCreated(posts()).database(), "main");
    assert_eq!(Event::DatabaseCreated(main_db()).database(), "main");
    assert_eq!(Event::DatabaseDeleted("old".to_string()).database(), "old");
}
