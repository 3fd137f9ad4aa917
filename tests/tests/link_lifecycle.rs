use strata::{Field, FieldTag, FieldType, Link, LinkState, SchemaDef};
use tests::{tests, Setup};

async fn close_twice_is_link_closed(setup: &dyn Setup) {
    let link = setup.link("main").await;
    assert_eq!(link.state(), LinkState::Active);

    link.close().await.unwrap();
    assert_eq!(link.state(), LinkState::Closed);

    let err = link.close().await.unwrap_err();
    assert!(err.is_link_closed());
    assert_eq!(err.to_string(), "link for database `main` is closed");
}

async fn closed_link_rejects_operations(setup: &dyn Setup) {
    let link = setup.link("main").await;
    let clone = link.clone();
    link.close().await.unwrap();

    let schema = SchemaDef::new("main", "posts")
        .field(Field::new("id", FieldType::Uuid).tag(FieldTag::Primary));

    assert!(clone.set_schemas(vec![schema]).await.unwrap_err().is_link_closed());
    assert!(clone.discover().await.unwrap_err().is_link_closed());
}

async fn definition_is_exposed(setup: &dyn Setup) {
    let link = setup.link("main").await;

    assert_eq!(link.name(), "main");
    assert_eq!(link.dialect(), setup.dialect());
    assert_eq!(link.definition(), &setup.database("main"));
}

tests!(
    close_twice_is_link_closed,
    closed_link_rejects_operations,
    definition_is_exposed,
);

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn connect_fails_for_unopenable_database() {
    let def = strata::DatabaseDef::new(
        "broken",
        "sqlite:///nonexistent-strata-dir/db.sqlite",
        strata::Dialect::Sqlite,
    );

    let err = Link::connect(def).await.unwrap_err();
    assert!(err.to_string().starts_with("connecting database `broken`"), "{err}");
}
