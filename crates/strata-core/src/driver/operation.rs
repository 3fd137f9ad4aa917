use crate::{schema::db::Migration, stmt::Statement};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Apply schema changes, one statement at a time.
    ApplyMigration(Migration),

    /// Execute a row-level statement.
    QuerySql(Statement),
}

impl From<Statement> for Operation {
    fn from(value: Statement) -> Self {
        Operation::QuerySql(value)
    }
}

impl From<Migration> for Operation {
    fn from(value: Migration) -> Self {
        Operation::ApplyMigration(value)
    }
}
