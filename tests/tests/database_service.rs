#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use strata::{bootstrap, database::type_from_dsn, DatabaseDef, Dialect, ErrorClass, StrataConfig};
use tests::init_logging;

#[test]
fn dialect_from_dsn() {
    assert_eq!(type_from_dsn("postgresql://host/db").unwrap(), Dialect::Postgres);
    assert_eq!(type_from_dsn("mariadb://host").unwrap(), Dialect::Mysql);
    assert_eq!(type_from_dsn("sqlite::memory:").unwrap(), Dialect::Sqlite);

    let err = type_from_dsn("ftp://host").unwrap_err();
    assert!(err.is_unsupported_database_type());
    assert_eq!(err.class(), ErrorClass::Invalid);
}

#[tokio::test]
async fn create_find_delete() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();
    let databases = &strata.databases;

    // The declared type is replaced by the one derived from the DSN.
    let stored = databases
        .create(DatabaseDef::new("analytics", "sqlite::memory:", Dialect::Postgres))
        .await
        .unwrap();
    assert_eq!(stored.ty, Dialect::Sqlite);

    let found = databases.find_by_name("analytics").await.unwrap();
    assert_eq!(found, Some(stored.clone()));
    assert_eq!(databases.find_by_name("nope").await.unwrap(), None);

    let system = databases.find_by_name("system").await.unwrap().unwrap();
    assert!(system.is_system());

    assert_eq!(databases.find_all().await.unwrap().len(), 2);

    assert!(databases.delete("analytics").await.unwrap());
    assert!(!databases.delete("analytics").await.unwrap());
    assert_eq!(databases.find_all().await.unwrap().len(), 1);

    strata.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_definitions_are_rejected() {
    init_logging();
    let strata = bootstrap(StrataConfig::default()).await.unwrap();
    let databases = &strata.databases;

    let err = databases
        .create(DatabaseDef::new("legacy", "ftp://host/legacy", Dialect::Mysql))
        .await
        .unwrap_err();
    assert!(err.is_unsupported_database_type());

    let err = databases
        .create(DatabaseDef::new("system", "sqlite::memory:", Dialect::Sqlite))
        .await
        .unwrap_err();
    assert!(err.is_invalid_schema());

    databases
        .create(DatabaseDef::new("main", "sqlite::memory:", Dialect::Sqlite))
        .await
        .unwrap();
    let err = databases
        .create(DatabaseDef::new("main", "sqlite::memory:", Dialect::Sqlite))
        .await
        .unwrap_err();
    assert!(err.is_invalid_schema());

    assert!(databases.delete("system").await.unwrap_err().is_invalid_schema());

    strata.shutdown().await.unwrap();
}
