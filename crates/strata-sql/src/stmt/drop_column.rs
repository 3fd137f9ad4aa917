use super::{Name, Statement};

/// A statement to drop a column from a table.
#[derive(Debug, Clone)]
pub struct DropColumn {
    /// Name of the table.
    pub table: Name,

    /// Name of the column to drop.
    pub name: Name,

    /// Whether or not to add an `IF EXISTS` clause.
    pub if_exists: bool,
}

impl Statement {
    /// Drops a column.
    ///
    /// This function _does not_ add an `IF EXISTS` clause.
    pub fn drop_column(table: &str, name: &str) -> Self {
        DropColumn {
            table: Name::from(table),
            name: Name::from(name),
            if_exists: false,
        }
        .into()
    }
}

impl From<DropColumn> for Statement {
    fn from(value: DropColumn) -> Self {
        Self::DropColumn(value)
    }
}
