use strata_core::{
    driver::Capability,
    schema::db::{ColumnsDiff, ColumnsDiffItem, IndicesDiffItem, Migration, Table, TableDiff},
};

use crate::{
    stmt::{AlterColumnChanges, Name, Statement},
    Serializer,
};

/// Prefix of the temporary table used when SQLite rebuilds a table.
const REBUILD_PREFIX: &str = "_strata_new_";

pub struct MigrationStatement {
    statement: Statement,
}

impl MigrationStatement {
    pub fn from_diff(diff: &TableDiff<'_>, capability: &Capability) -> Vec<Self> {
        let mut result = Vec::new();

        match diff {
            TableDiff::CreateTable(table) => {
                let inline = !capability.create_index_if_not_exists;
                result.push(Statement::create_table(table, inline));

                if !inline {
                    for index in &table.indices {
                        result.push(Statement::create_index(&table.name, index));
                    }
                }
            }
            TableDiff::AlterTable {
                from,
                to,
                columns,
                indices,
            } => {
                if from.name != to.name {
                    result.push(Statement::alter_table_rename_to(&from.name, &to.name));
                }

                let table = to.name.as_str();

                if !capability.alter_column && columns.has_alterations() {
                    // SQLite cannot alter columns in place. Rebuild the table,
                    // which also recreates every index.
                    rebuild_table(&mut result, to, columns);
                } else {
                    for item in columns.iter() {
                        match item {
                            ColumnsDiffItem::AddColumn(column) => {
                                result.push(Statement::add_column(table, column));
                            }
                            ColumnsDiffItem::DropColumn(column) => {
                                result.push(Statement::drop_column(table, &column.name));
                            }
                            ColumnsDiffItem::AlterColumn { from, to } => {
                                let changes = AlterColumnChanges::from_diff(from, to);

                                // Split up changes into multiple statements for databases that
                                // do not support changing multiple column properties in one statement.
                                let changes = if capability.alter_column_properties_atomic {
                                    vec![changes]
                                } else {
                                    changes.split()
                                };

                                for changes in changes {
                                    result.push(Statement::alter_column(table, from, changes));
                                }
                            }
                        }
                    }

                    for item in indices.iter() {
                        match item {
                            IndicesDiffItem::CreateIndex(index) => {
                                result.push(Statement::create_index(table, index));
                            }
                            IndicesDiffItem::DropIndex(index) => {
                                result.push(Statement::drop_index_if_exists(table, index));
                            }
                        }
                    }
                }
            }
        }

        result
            .into_iter()
            .map(|statement| MigrationStatement { statement })
            .collect()
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

/// Generates the statements applying `diff` and joins them into a
/// [`Migration`].
pub fn generate_migration(
    serializer: &Serializer,
    diff: &TableDiff<'_>,
    capability: &Capability,
) -> Migration {
    let statements = MigrationStatement::from_diff(diff, capability)
        .iter()
        .map(|stmt| serializer.serialize(stmt.statement(), &mut Vec::new()))
        .collect::<Vec<_>>();

    Migration::new_sql_with_breakpoints(&statements)
}

fn rebuild_table(result: &mut Vec<Statement>, to: &Table, columns: &ColumnsDiff<'_>) {
    let current = to.name.as_str();
    let new_name = format!("{REBUILD_PREFIX}{current}");

    // Columns that keep their data: unchanged ones keep their name, altered
    // ones may have been renamed.
    let added: Vec<&str> = columns
        .iter()
        .filter_map(|item| match item {
            ColumnsDiffItem::AddColumn(column) => Some(column.name.as_str()),
            _ => None,
        })
        .collect();

    let copied = to
        .columns
        .iter()
        .filter(|column| !added.contains(&column.name.as_str()))
        .map(|column| {
            let source = columns
                .iter()
                .find_map(|item| match item {
                    ColumnsDiffItem::AlterColumn { from, to } if to.name == column.name => {
                        Some(from.name.as_str())
                    }
                    _ => None,
                })
                .unwrap_or(column.name.as_str());

            (Name::from(&column.name), Name::from(source))
        })
        .collect();

    result.push(Statement::pragma_disable_foreign_keys());
    result.push(Statement::create_table_as(to, &new_name, false));
    result.push(Statement::copy_table(
        Name::from(current),
        Name::from(new_name.as_str()),
        copied,
    ));
    result.push(Statement::drop_table(current));
    result.push(Statement::alter_table_rename_to(&new_name, current));
    for index in &to.indices {
        result.push(Statement::create_index(current, index));
    }
    result.push(Statement::pragma_enable_foreign_keys());
}
