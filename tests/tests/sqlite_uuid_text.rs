//! A UUID primary key with a nullable text column on SQLite, end to end.
#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use serde_json::json;
use strata::{
    core::{
        driver::Rows,
        schema::db::{ColumnDefault, Type},
        stmt::{ColumnRef, Filter, Insert, Query, Statement, Value},
    },
    Dialect, Field, FieldTag, FieldType, Link, SchemaDef,
};
use tests::{init_logging, record, Setup};

fn posts() -> SchemaDef {
    SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("title", FieldType::Text).tag(FieldTag::Nullable))
}

async fn link() -> Link {
    init_logging();
    tests::db::sqlite::SetupSqlite::new().link("main").await
}

#[test]
fn compiled_model_shape() {
    let model = strata::core::schema::compile(&posts(), Dialect::Sqlite).unwrap();

    let id = model.column("id").unwrap();
    assert!(id.primary_key);
    assert!(!id.nullable);
    assert_eq!(id.storage_ty, Type::Uuid);
    assert!(matches!(id.default, Some(ColumnDefault::Expr(_))));

    let title = model.column("title").unwrap();
    assert!(title.nullable);
    assert_eq!(title.storage_ty, Type::Text);
    assert_eq!(title.default, None);
}

#[tokio::test]
async fn create_then_resync() {
    let link = link().await;

    let report = link.set_schemas(vec![posts()]).await.unwrap();
    assert_eq!(report.created, vec!["posts".to_string()]);

    let statements = report.migrations[0].statements();
    assert_eq!(statements.len(), 1);
    assert!(
        statements[0].starts_with("CREATE TABLE IF NOT EXISTS \"posts\" ("),
        "got: {}",
        statements[0]
    );
    assert!(statements[0].contains("\"title\" TEXT,"), "got: {}", statements[0]);
    assert!(statements[0].contains("PRIMARY KEY (\"id\")"), "got: {}", statements[0]);

    let report = link.set_schemas(vec![posts()]).await.unwrap();
    assert!(report.is_noop());
    assert!(!report.is_destructive());
}

#[tokio::test]
async fn engine_generates_missing_uuid() {
    let link = link().await;
    link.set_schemas(vec![posts()]).await.unwrap();

    let title = ColumnRef {
        name: "title".to_string(),
        ty: Type::Text,
    };
    let id = ColumnRef {
        name: "id".to_string(),
        ty: Type::Uuid,
    };

    link.exec(Statement::Insert(Insert {
        table: "posts".to_string(),
        columns: vec![title.clone()],
        values: vec![Value::from("raw insert")],
        returning: None,
    }))
    .await
    .unwrap();

    let response = link
        .exec(Statement::Query(Query {
            table: "posts".to_string(),
            columns: vec![id],
            filter: Filter::all().eq(title, Value::from("raw insert")),
        }))
        .await
        .unwrap();

    let Rows::Values(rows) = response.rows else {
        panic!("expected rows");
    };
    let Value::String(generated) = &rows[0][0] else {
        panic!("expected a text uuid, got {:?}", rows[0][0]);
    };
    assert!(uuid::Uuid::parse_str(generated).is_ok(), "got: {generated}");
}

#[tokio::test]
async fn client_generates_missing_uuid() {
    let link = link().await;
    link.set_schemas(vec![posts()]).await.unwrap();

    let posts = link.model("posts").unwrap();
    let created = posts.create(record(json!({ "title": null }))).await.unwrap();

    let id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(created["title"], json!(null));

    let found = posts.find(record(json!({ "id": id }))).await.unwrap();
    assert_eq!(found, vec![created]);
}
