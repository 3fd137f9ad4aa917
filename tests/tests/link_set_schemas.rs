use pretty_assertions::assert_eq;
use serde_json::json;
use strata::{Field, FieldTag, FieldType, Materialization, SchemaDef, TypeParams};
use tests::{record, tests, Setup};

fn posts() -> SchemaDef {
    SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("title", FieldType::Text).tag(FieldTag::Nullable))
}

async fn first_sync_creates_tables(setup: &dyn Setup) {
    let link = setup.link("main").await;
    assert_eq!(link.materialization(), Materialization::Empty);

    let report = link.set_schemas(vec![posts()]).await.unwrap();

    assert_eq!(report.created, vec!["posts".to_string()]);
    assert_eq!(report.migrations.len(), 1);
    assert!(!report.is_destructive());
    assert_eq!(link.materialization(), Materialization::Populated);
    assert!(link.is_tracked("posts"));
}

async fn identical_sync_is_a_noop(setup: &dyn Setup) {
    let link = setup.link("main").await;

    link.set_schemas(vec![posts()]).await.unwrap();
    let report = link.set_schemas(vec![posts()]).await.unwrap();

    assert!(report.is_noop());
    assert!(!report.is_destructive());
    assert_eq!(report.unchanged, vec!["posts".to_string()]);
}

async fn added_field_alters_table(setup: &dyn Setup) {
    let link = setup.link("main").await;
    link.set_schemas(vec![posts()]).await.unwrap();

    let posts = link.model("posts").unwrap();
    posts.create(record(json!({ "title": "before" }))).await.unwrap();

    let next = self::posts().field(Field::new("views", FieldType::Integer).tag(FieldTag::Nullable));
    let report = link.set_schemas(vec![next]).await.unwrap();

    assert_eq!(report.altered, vec!["posts".to_string()]);
    assert!(!report.is_destructive());

    let posts = link.model("posts").unwrap();
    let created = posts
        .create(record(json!({ "title": "after", "views": 7 })))
        .await
        .unwrap();
    assert_eq!(created["views"], json!(7));

    let before = posts.find(record(json!({ "title": "before" }))).await.unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0]["views"], json!(null));
}

async fn renamed_column_keeps_data(setup: &dyn Setup) {
    let link = setup.link("main").await;
    link.set_schemas(vec![posts()]).await.unwrap();

    link.model("posts")
        .unwrap()
        .create(record(json!({ "title": "kept" })))
        .await
        .unwrap();

    // Same field reference, new physical column.
    let renamed = SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(
            Field::new("title", FieldType::Text)
                .column("headline")
                .tag(FieldTag::Nullable),
        );

    let report = link.set_schemas(vec![renamed]).await.unwrap();
    assert_eq!(report.altered, vec!["posts".to_string()]);
    assert!(report.failed.is_empty());

    let model = link.model("posts").unwrap();
    assert_eq!(model.model().field("title").unwrap().column, "headline");

    let rows = model.all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], json!("kept"));
}

async fn removed_schema_is_untracked_not_dropped(setup: &dyn Setup) {
    let link = setup.link("main").await;

    let tags = SchemaDef::new("main", "tags")
        .field(Field::new("id", FieldType::Integer).tag(FieldTag::Primary))
        .field(Field::new("name", FieldType::String).params(TypeParams::length(40)));

    link.set_schemas(vec![posts(), tags]).await.unwrap();
    let report = link.set_schemas(vec![posts()]).await.unwrap();

    assert!(report.is_noop());
    assert!(!link.is_tracked("tags"));
    assert!(link.model("tags").unwrap_err().is_not_registered());

    // The table is still there for discovery to find.
    let imported = link.discover().await.unwrap();
    let names: Vec<_> = imported.iter().map(|s| s.reference.as_str()).collect();
    assert_eq!(names, vec!["tags"]);
}

async fn invalid_schema_is_skipped(setup: &dyn Setup) {
    let link = setup.link("main").await;

    let broken = SchemaDef::new("main", "broken").field(Field::new("state", FieldType::Enum));

    let report = link.set_schemas(vec![broken, posts()]).await.unwrap();

    assert_eq!(report.skipped, vec!["broken".to_string()]);
    assert_eq!(report.created, vec!["posts".to_string()]);
    assert!(!link.is_tracked("broken"));
}

async fn schema_of_other_database_is_skipped(setup: &dyn Setup) {
    let link = setup.link("main").await;

    let mut stray = posts();
    stray.database = "elsewhere".to_string();

    let report = link.set_schemas(vec![stray]).await.unwrap();
    assert_eq!(report.skipped, vec!["posts".to_string()]);
    assert!(report.is_noop());
}

async fn table_name_collision_is_skipped(setup: &dyn Setup) {
    let link = setup.link("main").await;

    let twin = SchemaDef::new("main", "articles")
        .table("posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary));

    let report = link.set_schemas(vec![posts(), twin]).await.unwrap();
    assert_eq!(report.created, vec!["posts".to_string()]);
    assert_eq!(report.skipped, vec!["articles".to_string()]);
}

async fn readonly_schema_is_never_created(setup: &dyn Setup) {
    let link = setup.link("main").await;

    let report = link
        .set_schemas(vec![posts().tag(strata::TAG_READONLY)])
        .await
        .unwrap();

    assert!(report.is_noop());
    assert!(link.is_tracked("posts"));
    assert!(link.discover().await.unwrap().is_empty());
}

tests!(
    first_sync_creates_tables,
    identical_sync_is_a_noop,
    added_field_alters_table,
    renamed_column_keeps_data,
    removed_schema_is_untracked_not_dropped,
    invalid_schema_is_skipped,
    schema_of_other_database_is_skipped,
    table_name_collision_is_skipped,
    readonly_schema_is_never_created,
);
