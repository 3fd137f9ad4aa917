use std::collections::HashMap;
use strata_core::{
    driver::{CatalogColumn, CatalogTable},
    Error, Result,
};
use tokio_postgres::Client;

const TABLES: &str = "\
    SELECT table_name::TEXT \
    FROM information_schema.tables \
    WHERE table_schema = current_schema() \
      AND table_type = 'BASE TABLE' \
      AND table_name NOT LIKE '\\_strata\\_%' \
    ORDER BY table_name";

const COLUMNS: &str = "\
    SELECT table_name::TEXT, column_name::TEXT, data_type::TEXT, udt_name::TEXT, \
           character_maximum_length::INT4, numeric_precision::INT4, numeric_scale::INT4, \
           is_nullable::TEXT, column_default::TEXT, is_identity::TEXT \
    FROM information_schema.columns \
    WHERE table_schema = current_schema() \
    ORDER BY table_name, ordinal_position";

const PRIMARY_KEYS: &str = "\
    SELECT tc.table_name::TEXT, kcu.column_name::TEXT \
    FROM information_schema.table_constraints tc \
    JOIN information_schema.key_column_usage kcu \
      ON tc.constraint_name = kcu.constraint_name \
     AND tc.table_schema = kcu.table_schema \
     AND tc.table_name = kcu.table_name \
    WHERE tc.constraint_type = 'PRIMARY KEY' \
      AND tc.table_schema = current_schema() \
    ORDER BY tc.table_name, kcu.ordinal_position";

const ENUMS: &str = "\
    SELECT t.typname::TEXT, e.enumlabel::TEXT \
    FROM pg_type t \
    JOIN pg_enum e ON e.enumtypid = t.oid \
    ORDER BY t.typname, e.enumsortorder";

pub(crate) async fn introspect(client: &Client) -> Result<Vec<CatalogTable>> {
    let mut tables: Vec<CatalogTable> = client
        .query(TABLES, &[])
        .await
        .map_err(Error::driver_operation_failed)?
        .iter()
        .map(|row| CatalogTable {
            name: row.get(0),
            columns: vec![],
            primary_key: vec![],
        })
        .collect();

    let mut enums = HashMap::<String, Vec<String>>::new();
    for row in client
        .query(ENUMS, &[])
        .await
        .map_err(Error::driver_operation_failed)?
    {
        enums.entry(row.get(0)).or_default().push(row.get(1));
    }

    let columns = client
        .query(COLUMNS, &[])
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in &columns {
        let table_name: String = row.get(0);
        let Some(table) = tables.iter_mut().find(|t| t.name == table_name) else {
            continue;
        };

        let udt_name: String = row.get(3);
        let raw = raw_type(
            &row.get::<_, String>(2),
            &udt_name,
            row.get(4),
            row.get(5),
            row.get(6),
        );

        let default: Option<String> = row.get(8);
        let is_identity: Option<String> = row.get(9);

        let mut column = CatalogColumn::new(row.get::<_, String>(1), &raw);
        column.nullable = row.get::<_, String>(7) == "YES";
        column.auto_increment = is_identity.as_deref() == Some("YES")
            || default
                .as_deref()
                .is_some_and(|expr| expr.starts_with("nextval("));
        column.default = default;
        if let Some(values) = enums.get(&udt_name) {
            column.enum_values = values.clone();
        }

        table.columns.push(column);
    }

    for row in client
        .query(PRIMARY_KEYS, &[])
        .await
        .map_err(Error::driver_operation_failed)?
    {
        let table_name: String = row.get(0);
        if let Some(table) = tables.iter_mut().find(|t| t.name == table_name) {
            table.primary_key.push(row.get(1));
        }
    }

    Ok(tables)
}

/// Rebuilds a type string such as `CHARACTER VARYING(120)` from the pieces
/// `information_schema.columns` reports separately.
pub(crate) fn raw_type(
    data_type: &str,
    udt_name: &str,
    length: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> String {
    match (data_type, length, precision) {
        ("character varying" | "character", Some(length), _) => format!("{data_type}({length})"),
        ("numeric", _, Some(precision)) => format!("numeric({precision},{})", scale.unwrap_or(0)),
        ("USER-DEFINED" | "ARRAY", _, _) => udt_name.to_string(),
        _ => data_type.to_string(),
    }
}
