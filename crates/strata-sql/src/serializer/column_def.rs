use super::{ty::Quoted, Comma, Flavor, Ident, Params, ToSql};

use crate::stmt::ColumnDef;
use strata_core::schema::db::{ColumnDefault, Type};

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);
        let flavor = f.serializer.flavor;

        fmt!(f, name " " self.ty);

        if self.auto_increment && matches!(flavor, Flavor::Postgresql) {
            fmt!(f, " GENERATED BY DEFAULT AS IDENTITY");
        }

        if self.not_null {
            fmt!(f, " NOT NULL");
        }

        if self.auto_increment {
            match flavor {
                // SQLite only auto-increments a sole `INTEGER PRIMARY KEY`,
                // declared inline.
                Flavor::Sqlite => fmt!(f, " PRIMARY KEY AUTOINCREMENT"),
                Flavor::Mysql => fmt!(f, " AUTO_INCREMENT"),
                Flavor::Postgresql => {}
            }
        } else if let Some(default) = &self.default {
            // MySQL only accepts expression defaults on TEXT, BLOB and JSON
            // columns.
            let wrap = matches!(flavor, Flavor::Mysql)
                && matches!(default, ColumnDefault::Value(_))
                && matches!(self.ty, Type::Text | Type::Blob | Type::Json | Type::Jsonb);

            if wrap {
                fmt!(f, " DEFAULT (" default ")");
            } else {
                fmt!(f, " DEFAULT " default);
            }
        }

        if let Type::Enum(values) = &self.ty {
            if !matches!(flavor, Flavor::Mysql) {
                let values = Comma(values.iter().map(|value| Quoted(value)));
                fmt!(f, " CHECK (" Ident(&self.name) " IN (" values "))");
            }
        }
    }
}
