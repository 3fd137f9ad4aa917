use crate::driver::Capability;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational engine family targeted by a link or a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Mysql,
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Postgres, Dialect::Mysql, Dialect::Sqlite];

    pub fn capability(self) -> &'static Capability {
        match self {
            Dialect::Postgres => &Capability::POSTGRESQL,
            Dialect::Mysql => &Capability::MYSQL,
            Dialect::Sqlite => &Capability::SQLITE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
