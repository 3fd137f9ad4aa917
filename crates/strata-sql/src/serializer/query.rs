use super::{Comma, Delimited, Flavor, Formatter, Ident, Params, Placeholder, ToSql};

use crate::stmt::{self, ColumnRef, Condition, Filter, Value};
use strata_core::schema::db::Type;

/// A bound value. PostgreSQL placeholders carry a cast to the column type
/// so the server never has to infer parameter types.
struct Bind<'a>(&'a Value, &'a Type);

impl ToSql for Bind<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self.0, Some(self.1));
        fmt!(f, placeholder);

        if matches!(f.serializer.flavor, Flavor::Postgresql) {
            fmt!(f, "::" self.1);
        }
    }
}

/// A selected column. PostgreSQL returns every value without a direct Rust
/// mapping as text.
struct SelectColumn<'a>(&'a ColumnRef);

impl ToSql for SelectColumn<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.0.name));

        let native = matches!(
            self.0.ty,
            Type::Boolean | Type::Integer { .. } | Type::Float(_) | Type::Blob | Type::Json | Type::Jsonb
        );
        if matches!(f.serializer.flavor, Flavor::Postgresql) && !native {
            fmt!(f, "::TEXT");
        }
    }
}

impl ToSql for &Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Condition::Eq(column, value) => {
                fmt!(f, Ident(&column.name) " = " Bind(value, &column.ty))
            }
            Condition::IsNull(column) => fmt!(f, Ident(&column.name) " IS NULL"),
        }
    }
}

impl ToSql for &Filter {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.is_empty() {
            fmt!(f, " WHERE " Delimited(&self.conditions, " AND "));
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let returning = self.returning.as_ref().map(|column| (" RETURNING ", Ident(&column.name)));

        if returning.is_some() && f.serializer.is_mysql() {
            panic!("MySQL does not support the RETURNING clause with INSERT statements; returning={:#?}", self.returning);
        }

        fmt!(f, "INSERT INTO " Ident(&self.table));

        if self.columns.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, " () VALUES ()");
            } else {
                fmt!(f, " DEFAULT VALUES");
            }
        } else {
            let columns = Comma(self.columns.iter().map(|column| Ident(&column.name)));
            let values = Comma(
                self.values
                    .iter()
                    .zip(&self.columns)
                    .map(|(value, column)| Bind(value, &column.ty)),
            );
            fmt!(f, " (" columns ") VALUES (" values ")");
        }

        fmt!(f, returning);
    }
}

impl ToSql for &stmt::Query {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(SelectColumn));
        fmt!(f, "SELECT " columns " FROM " Ident(&self.table) self.filter);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| (Ident(&column.name), (" = ", Bind(value, &column.ty)))),
        );
        fmt!(f, "UPDATE " Ident(&self.table) " SET " assignments self.filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) self.filter);
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        match f.serializer.flavor {
            Flavor::Mysql => f.dst.push('?'),
            Flavor::Postgresql => write!(f.dst, "${}", self.0).unwrap(),
            Flavor::Sqlite => write!(f.dst, "?{}", self.0).unwrap(),
        }
    }
}
