use super::{Comma, Flavor, Formatter, Params, ToSql};

use strata_core::schema::db::Type;

use std::fmt::Write;

impl ToSql for &Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let flavor = f.serializer.flavor;

        match self {
            Type::Boolean => fmt!(f, "BOOLEAN"),
            Type::Integer {
                bytes,
                unsigned,
                zerofill,
                width,
            } => match flavor {
                Flavor::Postgresql => match bytes {
                    1 | 2 => fmt!(f, "SMALLINT"),
                    3 | 4 => fmt!(f, "INTEGER"),
                    _ => fmt!(f, "BIGINT"),
                },
                Flavor::Sqlite => fmt!(f, "INTEGER"),
                Flavor::Mysql => {
                    fmt!(
                        f,
                        match bytes {
                            1 => "TINYINT",
                            2 => "SMALLINT",
                            3 => "MEDIUMINT",
                            4 => "INT",
                            _ => "BIGINT",
                        }
                    );
                    if let Some(width) = width {
                        write!(f.dst, "({width})").unwrap();
                    }
                    if *unsigned {
                        fmt!(f, " UNSIGNED");
                    }
                    if *zerofill {
                        fmt!(f, " ZEROFILL");
                    }
                }
            },
            Type::Float(bytes) => fmt!(
                f,
                match (flavor, bytes) {
                    (Flavor::Postgresql, 4) => "REAL",
                    (Flavor::Postgresql, _) => "DOUBLE PRECISION",
                    (Flavor::Mysql, 4) => "FLOAT",
                    (Flavor::Mysql, _) => "DOUBLE",
                    (Flavor::Sqlite, 4) => "REAL",
                    (Flavor::Sqlite, _) => "DOUBLE",
                }
            ),
            Type::Numeric(precision) => {
                let name = match flavor {
                    Flavor::Mysql => "DECIMAL",
                    Flavor::Postgresql | Flavor::Sqlite => "NUMERIC",
                };
                fmt!(f, name);
                if let Some((precision, scale)) = precision {
                    write!(f.dst, "({precision}, {scale})").unwrap();
                }
            }
            Type::Char { length, binary } => {
                write!(f.dst, "CHAR({length})").unwrap();
                if *binary && f.serializer.is_mysql() {
                    fmt!(f, " BINARY");
                }
            }
            Type::VarChar { length, binary } => {
                write!(f.dst, "VARCHAR({length})").unwrap();
                if *binary && f.serializer.is_mysql() {
                    fmt!(f, " BINARY");
                }
            }
            Type::Text => fmt!(f, "TEXT"),
            Type::Blob => fmt!(
                f,
                match flavor {
                    Flavor::Postgresql => "BYTEA",
                    Flavor::Mysql | Flavor::Sqlite => "BLOB",
                }
            ),
            Type::Uuid => fmt!(
                f,
                match flavor {
                    Flavor::Mysql => "CHAR(36)",
                    Flavor::Postgresql | Flavor::Sqlite => "UUID",
                }
            ),
            Type::Json => fmt!(f, "JSON"),
            Type::Jsonb => fmt!(
                f,
                match flavor {
                    Flavor::Postgresql => "JSONB",
                    Flavor::Mysql | Flavor::Sqlite => "JSON",
                }
            ),
            // Postgres and SQLite restrict the values with a CHECK constraint
            // emitted by the column definition.
            Type::Enum(values) => match flavor {
                Flavor::Mysql => {
                    let values = values.iter().map(|value| value.as_str());
                    fmt!(f, "ENUM(" Comma(values.map(Quoted)) ")")
                }
                Flavor::Postgresql | Flavor::Sqlite => fmt!(f, "TEXT"),
            },
            Type::Timestamp => fmt!(
                f,
                match flavor {
                    Flavor::Postgresql => "TIMESTAMP WITH TIME ZONE",
                    Flavor::Mysql | Flavor::Sqlite => "DATETIME",
                }
            ),
            Type::Date => fmt!(f, "DATE"),
            Type::Time => fmt!(f, "TIME"),
            Type::Custom(name) => fmt!(f, name),
        }
    }
}

/// A single-quoted string literal.
pub(super) struct Quoted<'a>(pub(super) &'a str);

impl ToSql for Quoted<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push('\'');
        for c in self.0.chars() {
            if c == '\'' {
                f.dst.push('\'');
            }
            f.dst.push(c);
        }
        f.dst.push('\'');
    }
}
