use super::Statement;

/// `PRAGMA <name> = <value>`, SQLite only.
#[derive(Debug, Clone)]
pub struct Pragma {
    pub name: String,
    pub value: String,
}

impl Pragma {
    fn foreign_keys(on: bool) -> Pragma {
        Pragma {
            name: "foreign_keys".to_string(),
            value: if on { "ON" } else { "OFF" }.to_string(),
        }
    }
}

impl Statement {
    /// Re-enables foreign key enforcement after a table rebuild.
    pub fn pragma_enable_foreign_keys() -> Self {
        Pragma::foreign_keys(true).into()
    }

    /// Suspends foreign key enforcement while a table is rebuilt, so rows
    /// referencing it survive the drop and rename.
    pub fn pragma_disable_foreign_keys() -> Self {
        Pragma::foreign_keys(false).into()
    }
}

impl From<Pragma> for Statement {
    fn from(value: Pragma) -> Self {
        Self::Pragma(value)
    }
}
