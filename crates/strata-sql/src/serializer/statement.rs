use super::{Comma, Flavor, Ident, Params, ToSql};

use crate::stmt::{self, AlterColumnChanges, ColumnDef};

struct ColumnsWithConstraints<'a>(&'a stmt::CreateTable);

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        // SQLite declares an auto-increment key inline with its column
        let trailing_pk = !self.0.primary_key.is_empty()
            && !(f.serializer.is_sqlite() && self.0.columns.iter().any(|c| c.auto_increment));

        for (index, column) in self.0.columns.iter().enumerate() {
            fmt!(f, "\n    " column);
            if index < self.0.columns.len() - 1 {
                fmt!(f, ",");
            }
        }

        if trailing_pk {
            fmt!(f, ",\n    PRIMARY KEY (" Comma(&self.0.primary_key) ")");
        }

        for index in &self.0.indices {
            let unique = if index.unique { "UNIQUE " } else { "" };
            fmt!(f, ",\n    " unique "INDEX " index.name " (" Comma(&index.columns) ")");
        }

        fmt!(f, "\n");
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let if_not_exists = if self.if_not_exists && !f.serializer.is_mysql() {
            "IF NOT EXISTS "
        } else {
            ""
        };

        fmt!(
            f, "CREATE " unique "INDEX " if_not_exists self.name " ON " self.on " (" Comma(&self.columns) ")"
        );
    }
}

impl ToSql for &stmt::AddColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "ALTER TABLE " self.table " ADD COLUMN " self.column);
    }
}

impl ToSql for &stmt::AlterColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table_name = &self.table;
        let column_name = Ident(&self.column_def.name);

        match f.serializer.flavor {
            Flavor::Postgresql => match &self.changes {
                AlterColumnChanges {
                    new_name: Some(name),
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: None,
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " RENAME COLUMN " column_name " TO " Ident(name.as_str())),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: Some(ty),
                    new_not_null: None,
                    new_auto_increment: None,
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " TYPE " ty " USING " Ident(&self.column_def.name) "::" ty),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: Some(true),
                    new_auto_increment: None,
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " SET NOT NULL"),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: Some(false),
                    new_auto_increment: None,
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " DROP NOT NULL"),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: Some(true),
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " ADD GENERATED BY DEFAULT AS IDENTITY"),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: Some(false),
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " DROP IDENTITY"),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: None,
                    new_default: Some(Some(default)),
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " SET DEFAULT " default),
                AlterColumnChanges {
                    new_name: None,
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: None,
                    new_default: Some(None),
                } => fmt!(f, "ALTER TABLE " table_name " ALTER COLUMN " column_name " DROP DEFAULT"),
                _ => panic!("PostgreSQL does not support modifying multiple column properties in one ALTER TABLE statement")
            },
            Flavor::Mysql => {
                let changes = &self.changes;
                let new_column_def = ColumnDef {
                    name: changes.new_name.as_ref().unwrap_or(&self.column_def.name).clone(),
                    ty: changes.new_ty.as_ref().unwrap_or(&self.column_def.ty).clone(),
                    not_null: changes.new_not_null.unwrap_or(self.column_def.not_null),
                    auto_increment: changes.new_auto_increment.unwrap_or(self.column_def.auto_increment),
                    default: changes.new_default.clone().unwrap_or_else(|| self.column_def.default.clone()),
                };
                fmt!(f, "ALTER TABLE " table_name " CHANGE COLUMN " column_name " " new_column_def)
            },
            Flavor::Sqlite => match &self.changes {
                AlterColumnChanges {
                    new_name: Some(name),
                    new_ty: None,
                    new_not_null: None,
                    new_auto_increment: None,
                    new_default: None,
                } => fmt!(f, "ALTER TABLE " table_name " RENAME COLUMN " column_name " TO " Ident(name.as_str())),
                _ => panic!("SQLite only supports renaming columns in ALTER TABLE statement")
            },
        }
    }
}

impl ToSql for &stmt::AlterTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match &self.action {
            stmt::AlterTableAction::RenameTo(new_name) => {
                fmt!(f, "ALTER TABLE " self.name " RENAME TO " new_name);
            }
        }
    }
}

impl ToSql for &stmt::CopyTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let target_cols = Comma(self.columns.iter().map(|(target, _)| target));
        let source_cols = Comma(self.columns.iter().map(|(_, source)| source));
        fmt!(f, "INSERT INTO " self.target " (" target_cols ") SELECT " source_cols " FROM " self.source);
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };
        let columns = ColumnsWithConstraints(self);

        fmt!(f, "CREATE TABLE " if_not_exists self.name " (" columns ")");
    }
}

impl ToSql for &stmt::DropColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "ALTER TABLE " self.table " DROP COLUMN " if_exists self.name);
    }
}

impl ToSql for &stmt::DropIndex {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if f.serializer.is_mysql() {
            fmt!(f, "DROP INDEX " self.name " ON " self.on);
        } else {
            let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
            fmt!(f, "DROP INDEX " if_exists self.name);
        }
    }
}

impl ToSql for &stmt::Pragma {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if !f.serializer.is_sqlite() {
            panic!("\"PRAGMA\" statements only supported in SQLite");
        }
        fmt!(f, "PRAGMA " self.name.as_str() " = " self.value.as_str());
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE " if_exists self.name);
    }
}

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Statement::AddColumn(stmt) => stmt.to_sql(f),
            stmt::Statement::AlterColumn(stmt) => stmt.to_sql(f),
            stmt::Statement::AlterTable(stmt) => stmt.to_sql(f),
            stmt::Statement::CopyTable(stmt) => stmt.to_sql(f),
            stmt::Statement::CreateIndex(stmt) => stmt.to_sql(f),
            stmt::Statement::CreateTable(stmt) => stmt.to_sql(f),
            stmt::Statement::DropColumn(stmt) => stmt.to_sql(f),
            stmt::Statement::DropIndex(stmt) => stmt.to_sql(f),
            stmt::Statement::DropTable(stmt) => stmt.to_sql(f),
            stmt::Statement::Pragma(stmt) => stmt.to_sql(f),
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Query(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}
