const BREAKPOINT: &str = "\n-- #[strata::breakpoint]\n";

/// Database migration generated from a [`super::TableDiff`] by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Migration {
    Sql(String),
}

impl Migration {
    /// Create a new SQL migration from multiple SQL statements.
    /// Statements are joined with breakpoint markers.
    pub fn new_sql_with_breakpoints<S: AsRef<str>>(statements: &[S]) -> Self {
        let sql = statements
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(BREAKPOINT);
        Migration::Sql(sql)
    }

    /// Get individual SQL statements by splitting on breakpoint markers.
    pub fn statements(&self) -> Vec<&str> {
        match self {
            Migration::Sql(sql) => sql.split(BREAKPOINT).filter(|s| !s.is_empty()).collect(),
        }
    }

    /// Returns `true` if applying the migration may destroy data, i.e. it
    /// drops a table or a column.
    pub fn is_destructive(&self) -> bool {
        self.statements().iter().any(|stmt| {
            let stmt = stmt.to_ascii_uppercase();
            stmt.starts_with("DROP TABLE") || stmt.contains(" DROP COLUMN ")
        })
    }
}
