use super::{ColumnDef, Name, Statement};

use strata_core::schema::db::Column;

/// A statement to add a column to a table.
#[derive(Debug, Clone)]
pub struct AddColumn {
    /// Name of the table to add the column to.
    pub table: Name,

    /// The column definition.
    pub column: ColumnDef,
}

impl Statement {
    pub fn add_column(table: &str, column: &Column) -> Self {
        AddColumn {
            table: Name::from(table),
            column: ColumnDef::from_schema(column),
        }
        .into()
    }
}

impl From<AddColumn> for Statement {
    fn from(value: AddColumn) -> Self {
        Self::AddColumn(value)
    }
}
