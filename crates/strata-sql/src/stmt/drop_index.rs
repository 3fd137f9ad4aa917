use super::{Name, Statement};

use strata_core::schema::db::Index;

/// A statement to drop a SQL index.
#[derive(Debug, Clone)]
pub struct DropIndex {
    /// Name of the index.
    pub name: Name,

    /// Table the index belongs to. Only MySQL spells it out.
    pub on: Name,

    /// Whether or not to add an `IF EXISTS` clause.
    pub if_exists: bool,
}

impl Statement {
    /// Drops an index if it exists.
    pub fn drop_index_if_exists(table: &str, index: &Index) -> Self {
        DropIndex {
            name: Name::from(&index.name),
            on: Name::from(table),
            if_exists: true,
        }
        .into()
    }
}

impl From<DropIndex> for Statement {
    fn from(value: DropIndex) -> Self {
        Self::DropIndex(value)
    }
}
