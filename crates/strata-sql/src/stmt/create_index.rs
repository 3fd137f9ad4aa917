use super::{Name, Statement};

use strata_core::schema::db::Index;

#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index
    pub name: Name,

    /// Which table to index
    pub on: Name,

    /// The columns to index
    pub columns: Vec<Name>,

    /// When true, the index is unique
    pub unique: bool,

    /// Whether or not to add an `IF NOT EXISTS` clause.
    pub if_not_exists: bool,
}

impl CreateIndex {
    pub(crate) fn new(table: &str, index: &Index, if_not_exists: bool) -> Self {
        CreateIndex {
            name: Name::from(&index.name),
            on: Name::from(table),
            columns: index.columns.iter().map(Name::from).collect(),
            unique: index.unique,
            if_not_exists,
        }
    }
}

impl Statement {
    pub fn create_index(table: &str, index: &Index) -> Self {
        CreateIndex::new(table, index, true).into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
