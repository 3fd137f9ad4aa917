use mysql_async::{prelude::Queryable, Conn};
use strata_core::{
    driver::{CatalogColumn, CatalogTable},
    Error, Result,
};

const TABLES: &str = "\
    SELECT TABLE_NAME FROM information_schema.TABLES \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
    ORDER BY TABLE_NAME";

const COLUMNS: &str = "\
    SELECT TABLE_NAME, COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT, EXTRA \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() \
    ORDER BY TABLE_NAME, ORDINAL_POSITION";

const PRIMARY_KEYS: &str = "\
    SELECT TABLE_NAME, COLUMN_NAME FROM information_schema.KEY_COLUMN_USAGE \
    WHERE TABLE_SCHEMA = DATABASE() AND CONSTRAINT_NAME = 'PRIMARY' \
    ORDER BY TABLE_NAME, ORDINAL_POSITION";

type ColumnRow = (String, String, String, String, Option<String>, String);

pub(crate) async fn introspect(conn: &mut Conn) -> Result<Vec<CatalogTable>> {
    let names: Vec<String> = conn
        .query(TABLES)
        .await
        .map_err(Error::driver_operation_failed)?;

    let mut tables: Vec<CatalogTable> = names
        .into_iter()
        .filter(|name| !name.starts_with("_strata_"))
        .map(|name| CatalogTable {
            name,
            columns: vec![],
            primary_key: vec![],
        })
        .collect();

    let columns: Vec<ColumnRow> = conn
        .query(COLUMNS)
        .await
        .map_err(Error::driver_operation_failed)?;

    for (table_name, name, column_type, is_nullable, default, extra) in columns {
        let Some(table) = tables.iter_mut().find(|t| t.name == table_name) else {
            continue;
        };

        let (raw, enum_values) = normalize_column_type(&column_type);

        let mut column = CatalogColumn::new(name, &raw);
        column.nullable = is_nullable == "YES";
        column.default = default;
        column.enum_values = enum_values;
        column.auto_increment = extra.to_ascii_lowercase().contains("auto_increment");

        table.columns.push(column);
    }

    let keys: Vec<(String, String)> = conn
        .query(PRIMARY_KEYS)
        .await
        .map_err(Error::driver_operation_failed)?;

    for (table_name, column) in keys {
        if let Some(table) = tables.iter_mut().find(|t| t.name == table_name) {
            table.primary_key.push(column);
        }
    }

    Ok(tables)
}

/// Turns a MySQL `COLUMN_TYPE` into a portable type string plus the members
/// of an `enum(...)`. Integer display widths and sign modifiers are dropped,
/// except `tinyint(1)` which MySQL uses for booleans.
pub(crate) fn normalize_column_type(column_type: &str) -> (String, Vec<String>) {
    let trimmed = column_type.trim();

    // Values keep their original case
    let is_enum = trimmed
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("enum("));
    if is_enum && trimmed.ends_with(')') {
        let body = &trimmed[5..trimmed.len() - 1];
        return ("ENUM".to_string(), parse_enum_values(body));
    }

    let lower = trimmed.to_ascii_lowercase();

    if lower == "tinyint(1)" {
        return ("TINYINT(1)".to_string(), vec![]);
    }

    let base = lower
        .replace(" unsigned", "")
        .replace(" zerofill", "");

    let base = match base.split_once('(') {
        Some((name, _))
            if matches!(
                name,
                "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint"
            ) =>
        {
            name.to_string()
        }
        _ => base,
    };

    (base.to_ascii_uppercase(), vec![])
}

fn parse_enum_values(body: &str) -> Vec<String> {
    let mut values = vec![];
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\'' {
            continue;
        }

        let mut value = String::new();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    value.push('\'');
                } else {
                    break;
                }
            } else {
                value.push(c);
            }
        }
        values.push(value);
    }

    values
}
