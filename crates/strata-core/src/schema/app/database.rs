use crate::schema::Dialect;

use serde::{Deserialize, Serialize};

/// A connectable database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDef {
    /// Unique database name. Schemas refer to their database by this name.
    pub name: String,

    pub dsn: String,

    #[serde(rename = "type")]
    pub ty: Dialect,
}

impl DatabaseDef {
    /// Name of the bootstrap database that stores schemas and database
    /// definitions.
    pub const SYSTEM: &'static str = "system";

    pub fn new(name: impl Into<String>, dsn: impl Into<String>, ty: Dialect) -> DatabaseDef {
        DatabaseDef {
            name: name.into(),
            dsn: dsn.into(),
            ty,
        }
    }

    pub fn is_system(&self) -> bool {
        self.name == Self::SYSTEM
    }
}
