use super::{ColumnDef, CreateIndex, Name, Statement};

use strata_core::schema::db::Table;

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Primary key columns
    pub primary_key: Vec<Name>,

    /// Indices declared inside the statement, for engines that cannot create
    /// them conditionally afterwards.
    pub indices: Vec<CreateIndex>,

    /// Whether or not to add an `IF NOT EXISTS` clause.
    pub if_not_exists: bool,
}

impl CreateTable {
    fn from_schema(table: &Table, name: &str, inline_indices: bool, if_not_exists: bool) -> Self {
        CreateTable {
            name: Name::from(name),
            columns: table.columns.iter().map(ColumnDef::from_schema).collect(),
            primary_key: table
                .primary_key_columns()
                .map(|column| Name::from(&column.name))
                .collect(),
            indices: if inline_indices {
                table
                    .indices
                    .iter()
                    .map(|index| CreateIndex::new(name, index, false))
                    .collect()
            } else {
                vec![]
            },
            if_not_exists,
        }
    }
}

impl Statement {
    /// Creates a table if it does not exist yet. Indices are only included
    /// when `inline_indices` is set.
    pub fn create_table(table: &Table, inline_indices: bool) -> Self {
        CreateTable::from_schema(table, &table.name, inline_indices, true).into()
    }

    /// Creates `table` under another name, unconditionally. Used by table
    /// rebuilds.
    pub fn create_table_as(table: &Table, name: &str, inline_indices: bool) -> Self {
        CreateTable::from_schema(table, name, inline_indices, false).into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
