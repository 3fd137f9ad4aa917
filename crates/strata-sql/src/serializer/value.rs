use super::{ty::Quoted, Flavor, Formatter, Params, ToSql};

use strata_core::{schema::db::ColumnDefault, stmt::Value};

use std::fmt::Write;

/// A value rendered inline as a SQL literal, for DDL where placeholders are
/// not allowed.
pub(super) struct Literal<'a>(pub(super) &'a Value);

impl ToSql for Literal<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self.0 {
            Value::Null => fmt!(f, "NULL"),
            Value::Bool(v) => fmt!(
                f,
                match (f.serializer.flavor, v) {
                    (Flavor::Postgresql, true) => "TRUE",
                    (Flavor::Postgresql, false) => "FALSE",
                    (_, true) => "1",
                    (_, false) => "0",
                }
            ),
            Value::I64(v) => write!(f.dst, "{v}").unwrap(),
            Value::F64(v) => write!(f.dst, "{v:?}").unwrap(),
            Value::String(v) => Quoted(v).to_sql(f),
            Value::Bytes(v) => {
                let hex: String = v.iter().map(|b| format!("{b:02X}")).collect();
                match f.serializer.flavor {
                    Flavor::Postgresql => write!(f.dst, "'\\x{hex}'").unwrap(),
                    Flavor::Mysql | Flavor::Sqlite => write!(f.dst, "X'{hex}'").unwrap(),
                }
            }
            Value::Json(v) => Quoted(&v.to_string()).to_sql(f),
        }
    }
}

impl ToSql for &ColumnDefault {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            ColumnDefault::Value(value) => Literal(value).to_sql(f),
            ColumnDefault::Expr(expr) => fmt!(f, expr),
        }
    }
}
