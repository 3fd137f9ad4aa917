use strata_core::{
    driver::Capability,
    schema::db::{Column, Index, RenameHints, Table, TableDiff, Type},
};
use strata_sql::{generate_migration, migration::MigrationStatement, Serializer};

use pretty_assertions::assert_eq;

fn make_column(name: &str, storage_ty: Type, nullable: bool, primary_key: bool) -> Column {
    Column {
        nullable,
        primary_key,
        ..Column::new(name, storage_ty)
    }
}

fn make_table(name: &str, columns: Vec<Column>, indices: Vec<Index>) -> Table {
    let primary_key = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.primary_key)
        .map(|(i, _)| i)
        .collect();

    Table {
        name: name.to_string(),
        columns,
        primary_key,
        indices,
    }
}

fn serialize(
    from: &Table,
    to: &Table,
    hints: &RenameHints,
    capability: &Capability,
    serializer: &Serializer,
) -> Vec<String> {
    let diff = TableDiff::between(Some(from), to, hints).expect("tables differ");

    MigrationStatement::from_diff(&diff, capability)
        .iter()
        .map(|ms| serializer.serialize(ms.statement(), &mut Vec::new()))
        .collect()
}

fn users(name_nullable: bool) -> Table {
    make_table(
        "users",
        vec![
            make_column("id", Type::integer(8), false, true),
            make_column("name", Type::Text, name_nullable, false),
        ],
        vec![],
    )
}

#[test]
fn identical_tables_have_no_diff() {
    let table = users(false);
    assert!(TableDiff::between(Some(&table), &table, &RenameHints::new()).is_none());
}

#[test]
fn add_column_all_flavors() {
    let from = users(false);
    let mut to = users(false);
    to.columns
        .push(make_column("email", Type::varchar(255), true, false));

    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::SQLITE, &Serializer::sqlite()),
        vec!["ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR(255);"]
    );
    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::POSTGRESQL, &Serializer::postgresql()),
        vec!["ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR(255);"]
    );
    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::MYSQL, &Serializer::mysql()),
        vec!["ALTER TABLE `users` ADD COLUMN `email` VARCHAR(255);"]
    );
}

#[test]
fn drop_column() {
    let from = users(false);
    let to = make_table(
        "users",
        vec![make_column("id", Type::integer(8), false, true)],
        vec![],
    );

    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::POSTGRESQL, &Serializer::postgresql()),
        vec!["ALTER TABLE \"users\" DROP COLUMN \"name\";"]
    );
}

#[test]
fn alter_nullability_postgresql() {
    assert_eq!(
        serialize(
            &users(false),
            &users(true),
            &RenameHints::new(),
            &Capability::POSTGRESQL,
            &Serializer::postgresql()
        ),
        vec!["ALTER TABLE \"users\" ALTER COLUMN \"name\" DROP NOT NULL;"]
    );
}

#[test]
fn alter_nullability_mysql() {
    assert_eq!(
        serialize(
            &users(false),
            &users(true),
            &RenameHints::new(),
            &Capability::MYSQL,
            &Serializer::mysql()
        ),
        vec!["ALTER TABLE `users` CHANGE COLUMN `name` `name` TEXT;"]
    );
}

#[test]
fn alter_nullability_sqlite_rebuilds_table() {
    assert_eq!(
        serialize(
            &users(false),
            &users(true),
            &RenameHints::new(),
            &Capability::SQLITE,
            &Serializer::sqlite()
        ),
        vec![
            "PRAGMA foreign_keys = OFF;",
            "CREATE TABLE \"_strata_new_users\" (\n    \"id\" INTEGER NOT NULL,\n    \"name\" TEXT,\n    PRIMARY KEY (\"id\")\n);",
            "INSERT INTO \"_strata_new_users\" (\"id\", \"name\") SELECT \"id\", \"name\" FROM \"users\";",
            "DROP TABLE \"users\";",
            "ALTER TABLE \"_strata_new_users\" RENAME TO \"users\";",
            "PRAGMA foreign_keys = ON;",
        ]
    );
}

#[test]
fn rebuild_copies_renamed_column_and_recreates_indices() {
    let from = make_table(
        "posts",
        vec![
            make_column("id", Type::integer(8), false, true),
            make_column("title", Type::Text, false, false),
        ],
        vec![],
    );
    let to = make_table(
        "posts",
        vec![
            make_column("id", Type::integer(8), false, true),
            make_column("headline", Type::Text, true, false),
            make_column("body", Type::Text, true, false),
        ],
        vec![Index {
            name: "ix_posts_headline".to_string(),
            columns: vec!["headline".to_string()],
            unique: false,
        }],
    );

    let mut hints = RenameHints::new();
    hints.add_column_hint("title", "headline");

    let sql = serialize(&from, &to, &hints, &Capability::SQLITE, &Serializer::sqlite());

    assert_eq!(
        sql[2],
        "INSERT INTO \"_strata_new_posts\" (\"id\", \"headline\") SELECT \"id\", \"title\" FROM \"posts\";"
    );
    assert_eq!(
        sql[5],
        "CREATE INDEX IF NOT EXISTS \"ix_posts_headline\" ON \"posts\" (\"headline\");"
    );
    assert_eq!(sql.last().map(String::as_str), Some("PRAGMA foreign_keys = ON;"));
}

#[test]
fn alter_type_and_rename_postgresql_splits_statements() {
    let from = make_table(
        "posts",
        vec![
            make_column("id", Type::integer(8), false, true),
            make_column("views", Type::integer(4), false, false),
        ],
        vec![],
    );
    let to = make_table(
        "posts",
        vec![
            make_column("id", Type::integer(8), false, true),
            make_column("view_count", Type::integer(8), false, false),
        ],
        vec![],
    );

    let mut hints = RenameHints::new();
    hints.add_column_hint("views", "view_count");

    assert_eq!(
        serialize(&from, &to, &hints, &Capability::POSTGRESQL, &Serializer::postgresql()),
        vec![
            "ALTER TABLE \"posts\" ALTER COLUMN \"views\" TYPE BIGINT USING \"views\"::BIGINT;",
            "ALTER TABLE \"posts\" RENAME COLUMN \"views\" TO \"view_count\";",
        ]
    );

    assert_eq!(
        serialize(&from, &to, &hints, &Capability::MYSQL, &Serializer::mysql()),
        vec!["ALTER TABLE `posts` CHANGE COLUMN `views` `view_count` BIGINT NOT NULL;"]
    );
}

#[test]
fn index_changes() {
    let index = |unique| Index {
        name: "ix_users_name".to_string(),
        columns: vec!["name".to_string()],
        unique,
    };

    let from = users(false);
    let mut to = users(false);
    to.indices.push(index(false));

    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::SQLITE, &Serializer::sqlite()),
        vec!["CREATE INDEX IF NOT EXISTS \"ix_users_name\" ON \"users\" (\"name\");"]
    );

    assert_eq!(
        serialize(&to, &from, &RenameHints::new(), &Capability::SQLITE, &Serializer::sqlite()),
        vec!["DROP INDEX IF EXISTS \"ix_users_name\";"]
    );
    assert_eq!(
        serialize(&to, &from, &RenameHints::new(), &Capability::MYSQL, &Serializer::mysql()),
        vec!["DROP INDEX `ix_users_name` ON `users`;"]
    );

    let mut unique = users(false);
    unique.indices.push(index(true));
    assert_eq!(
        serialize(&to, &unique, &RenameHints::new(), &Capability::POSTGRESQL, &Serializer::postgresql()),
        vec![
            "DROP INDEX IF EXISTS \"ix_users_name\";",
            "CREATE UNIQUE INDEX IF NOT EXISTS \"ix_users_name\" ON \"users\" (\"name\");",
        ]
    );
}

#[test]
fn rename_table() {
    let from = users(false);
    let mut to = users(false);
    to.name = "members".to_string();

    assert_eq!(
        serialize(&from, &to, &RenameHints::new(), &Capability::POSTGRESQL, &Serializer::postgresql()),
        vec!["ALTER TABLE \"users\" RENAME TO \"members\";"]
    );
}

#[test]
fn generated_migration_joins_statements() {
    let from = users(false);
    let mut to = users(true);
    to.columns.push(make_column("bio", Type::Text, true, false));

    let diff = TableDiff::between(Some(&from), &to, &RenameHints::new()).unwrap();
    let migration = generate_migration(&Serializer::postgresql(), &diff, &Capability::POSTGRESQL);

    assert_eq!(
        migration.statements(),
        vec![
            "ALTER TABLE \"users\" ALTER COLUMN \"name\" DROP NOT NULL;",
            "ALTER TABLE \"users\" ADD COLUMN \"bio\" TEXT;",
        ]
    );
    assert!(!migration.is_destructive());
}
