use pretty_assertions::assert_eq;
use serde_json::json;
use strata::{
    core::{
        driver::Rows,
        stmt::{ColumnRef, Filter, Query, Statement},
    },
    ErrorClass, Field, FieldTag, FieldType, Link, SchemaDef, TypeParams,
};
use tests::{record, tests, Setup};

fn notes() -> SchemaDef {
    SchemaDef::new("main", "notes")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("body", FieldType::Text))
        .field(Field::new("meta", FieldType::Json).tag(FieldTag::Nullable))
        .field(Field::new("createdAt", FieldType::Date).tag(FieldTag::Created))
        .field(Field::new("updatedAt", FieldType::Date).tag(FieldTag::Updated))
        .field(Field::new("deletedAt", FieldType::Date).tag(FieldTag::Deleted))
        .field(Field::new("version", FieldType::Integer).tag(FieldTag::Version))
}

fn counters() -> SchemaDef {
    SchemaDef::new("main", "counters")
        .field(Field::new("id", FieldType::Integer).tag(FieldTag::Primary))
        .field(Field::new("label", FieldType::String).params(TypeParams::length(32)))
}

async fn link(setup: &dyn Setup) -> Link {
    let link = setup.link("main").await;
    let report = link.set_schemas(vec![notes(), counters()]).await.unwrap();
    assert!(report.failed.is_empty(), "{report:?}");
    link
}

async fn create_fills_audit_fields(setup: &dyn Setup) {
    let link = link(setup).await;
    let notes = link.model("notes").unwrap();

    let created = notes
        .create(record(json!({ "body": "hello" })))
        .await
        .unwrap();

    assert!(uuid::Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());
    assert_eq!(created["body"], json!("hello"));
    assert_eq!(created["version"], json!(0));
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());
    assert_eq!(created["deletedAt"], json!(null));
}

async fn explicit_values_are_kept(setup: &dyn Setup) {
    let link = link(setup).await;
    let notes = link.model("notes").unwrap();

    let id = "0f8fad5b-d9cb-469f-a165-70867728950e";
    let created = notes
        .create(record(json!({ "id": id, "body": "pinned", "version": 4 })))
        .await
        .unwrap();

    assert_eq!(created["id"], json!(id));
    assert_eq!(created["version"], json!(4));
}

async fn json_round_trips(setup: &dyn Setup) {
    let link = link(setup).await;
    let notes = link.model("notes").unwrap();

    let meta = json!({ "tags": ["a", "b"], "nested": { "n": 1, "ok": true } });
    let created = notes
        .create(record(json!({ "body": "doc", "meta": meta })))
        .await
        .unwrap();
    assert_eq!(created["meta"], meta);

    let empty = notes
        .create(record(json!({ "body": "no meta" })))
        .await
        .unwrap();
    assert_eq!(empty["meta"], json!(null));

    let without = notes.find(record(json!({ "meta": null }))).await.unwrap();
    assert_eq!(without.len(), 1);
    assert_eq!(without[0]["body"], json!("no meta"));
}

async fn soft_delete_hides_rows(setup: &dyn Setup) {
    let link = link(setup).await;
    let notes = link.model("notes").unwrap();

    let kept = notes.create(record(json!({ "body": "kept" }))).await.unwrap();
    let gone = notes.create(record(json!({ "body": "gone" }))).await.unwrap();

    let deleted = notes
        .delete(record(json!({ "id": gone["id"] })))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let live = notes.all().await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["id"], kept["id"]);
    assert!(notes.find(record(json!({ "id": gone["id"] }))).await.unwrap().is_empty());

    // Deleting again matches nothing.
    assert_eq!(notes.delete(record(json!({ "id": gone["id"] }))).await.unwrap(), 0);

    // The row is still in the table, marked.
    let model = notes.model();
    let deleted_at = model.column("deletedAt").unwrap();
    let response = link
        .exec(Statement::Query(Query {
            table: model.table_name().to_string(),
            columns: vec![ColumnRef {
                name: deleted_at.name.clone(),
                ty: deleted_at.storage_ty.clone(),
            }],
            filter: Filter::all(),
        }))
        .await
        .unwrap();

    let Rows::Values(rows) = response.rows else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|row| !row[0].is_null()).count(), 1);
}

async fn hard_delete_without_marker(setup: &dyn Setup) {
    let link = link(setup).await;
    let counters = link.model("counters").unwrap();

    counters.create(record(json!({ "label": "a" }))).await.unwrap();
    counters.create(record(json!({ "label": "b" }))).await.unwrap();

    assert_eq!(counters.delete(record(json!({ "label": "a" }))).await.unwrap(), 1);

    let rows = counters.all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["label"], json!("b"));
}

async fn auto_increment_key_is_reported(setup: &dyn Setup) {
    let link = link(setup).await;
    let counters = link.model("counters").unwrap();

    let first = counters.create(record(json!({ "label": "a" }))).await.unwrap();
    let second = counters.create(record(json!({ "label": "b" }))).await.unwrap();

    let first = first["id"].as_i64().unwrap();
    let second = second["id"].as_i64().unwrap();
    assert!(second > first);
}

async fn unknown_field_is_invalid(setup: &dyn Setup) {
    let link = link(setup).await;
    let notes = link.model("notes").unwrap();

    let err = notes
        .create(record(json!({ "body": "x", "colour": "red" })))
        .await
        .unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(err.class(), ErrorClass::Invalid);

    let err = notes.find(record(json!({ "colour": "red" }))).await.unwrap_err();
    assert!(err.is_invalid_schema());
}

async fn unknown_model_is_not_registered(setup: &dyn Setup) {
    let link = link(setup).await;

    let err = link.model("ghosts").unwrap_err();
    assert!(err.is_not_registered());
    assert_eq!(err.class(), ErrorClass::NotFound);
}

tests!(
    create_fills_audit_fields,
    explicit_values_are_kept,
    json_round_trips,
    soft_delete_hides_rows,
    hard_delete_without_marker,
    auto_increment_key_is_reported,
    unknown_field_is_invalid,
    unknown_model_is_not_registered,
);
