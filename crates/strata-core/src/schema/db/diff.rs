use super::{ColumnsDiff, IndicesDiff, Table};

use std::collections::HashMap;

/// Column renames known from the abstract definitions.
///
/// A field keeps its `reference` when its physical column name changes, so
/// the caller can tell a rename apart from a drop followed by an add.
#[derive(Debug, Default)]
pub struct RenameHints {
    columns: HashMap<String, String>,
}

impl RenameHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column_hint(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.columns.insert(from.into(), to.into());
    }

    pub fn column(&self, from: &str) -> Option<&str> {
        self.columns.get(from).map(String::as_str)
    }
}

/// Difference between the previous and the next shape of one table.
pub enum TableDiff<'a> {
    /// The table is new to the link and is created if it does not exist.
    CreateTable(&'a Table),

    AlterTable {
        from: &'a Table,
        to: &'a Table,
        columns: ColumnsDiff<'a>,
        indices: IndicesDiff<'a>,
    },
}

impl<'a> TableDiff<'a> {
    /// Computes the change from `from` to `to`, or `None` when the table is
    /// unchanged.
    pub fn between(from: Option<&'a Table>, to: &'a Table, hints: &RenameHints) -> Option<Self> {
        let Some(from) = from else {
            return Some(TableDiff::CreateTable(to));
        };

        let columns = ColumnsDiff::from(&from.columns, &to.columns, hints);
        let indices = IndicesDiff::from(&from.indices, &to.indices);

        if from.name == to.name && columns.is_empty() && indices.is_empty() {
            return None;
        }

        Some(TableDiff::AlterTable {
            from,
            to,
            columns,
            indices,
        })
    }

    /// Name of the table once the diff is applied.
    pub fn table_name(&self) -> &str {
        match self {
            TableDiff::CreateTable(table) => &table.name,
            TableDiff::AlterTable { to, .. } => &to.name,
        }
    }
}
