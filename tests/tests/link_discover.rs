use pretty_assertions::assert_eq;
use serde_json::json;
use strata::{Field, FieldTag, FieldType, SchemaDef, TypeParams, TAG_IMPORTED};
use tests::{record, tests, Setup};

fn accounts() -> SchemaDef {
    SchemaDef::new("legacy", "accounts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary))
        .field(Field::new("email", FieldType::String).params(TypeParams::length(120)))
        .field(Field::new("nickname", FieldType::Text).tag(FieldTag::Nullable))
}

/// Creates `accounts` through a managed schema, then forgets it so the table
/// is only known to the engine catalog.
async fn orphan_accounts(setup: &dyn Setup) -> strata::Link {
    let link = setup.link("legacy").await;
    link.set_schemas(vec![accounts()]).await.unwrap();
    link.model("accounts")
        .unwrap()
        .create(record(json!({ "email": "ada@example.com" })))
        .await
        .unwrap();
    link.set_schemas(vec![]).await.unwrap();
    link
}

async fn discovered_tables_are_imported(setup: &dyn Setup) {
    let link = orphan_accounts(setup).await;

    let imported = link.discover().await.unwrap();
    assert_eq!(imported.len(), 1);

    let schema = &imported[0];
    assert_eq!(schema.reference, "accounts");
    assert_eq!(schema.database, "legacy");
    assert!(schema.has_tag(TAG_IMPORTED));
    assert!(!schema.is_managed());

    let id = schema.field_by_reference("id").unwrap();
    assert!(id.is_primary());

    let email = schema.field_by_reference("email").unwrap();
    assert!(!email.is_nullable());
    assert_eq!(email.ty, FieldType::String);
    assert_eq!(email.type_params.length, Some(120));

    let nickname = schema.field_by_reference("nickname").unwrap();
    assert!(nickname.is_nullable());
}

async fn discovery_is_idempotent(setup: &dyn Setup) {
    let link = orphan_accounts(setup).await;

    assert_eq!(link.discover().await.unwrap().len(), 1);
    assert!(link.discover().await.unwrap().is_empty());
}

async fn imported_tables_are_queryable(setup: &dyn Setup) {
    let link = orphan_accounts(setup).await;
    link.discover().await.unwrap();

    let rows = link.model("accounts").unwrap().all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], json!("ada@example.com"));
}

async fn imported_schemas_are_never_altered(setup: &dyn Setup) {
    let link = orphan_accounts(setup).await;
    let mut imported = link.discover().await.unwrap();

    // Re-applying the imported definition with an extra field changes nothing.
    let mut schema = imported.remove(0);
    schema.fields.push(Field::new("extra", FieldType::Integer).tag(FieldTag::Nullable));

    let report = link.set_schemas(vec![schema]).await.unwrap();
    assert!(report.is_noop());
    assert_eq!(report.unchanged, vec!["accounts".to_string()]);
}

tests!(
    discovered_tables_are_imported,
    discovery_is_idempotent,
    imported_tables_are_queryable,
    imported_schemas_are_never_altered,
);
