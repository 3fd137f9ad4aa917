use super::{Filter, Value};
use crate::schema::db::{Column, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(Insert),
    Query(Query),
    Update(Update),
    Delete(Delete),
}

/// A physical column and its storage type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub name: String,
    pub ty: Type,
}

/// Inserts one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<ColumnRef>,
    pub values: Vec<Value>,

    /// Engine-generated column to report back, usually an auto-increment
    /// primary key.
    pub returning: Option<ColumnRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: Vec<ColumnRef>,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(ColumnRef, Value)>,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Filter,
}

impl Statement {
    pub fn table(&self) -> &str {
        match self {
            Statement::Insert(stmt) => &stmt.table,
            Statement::Query(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
            Statement::Delete(stmt) => &stmt.table,
        }
    }
}

impl From<&Column> for ColumnRef {
    fn from(column: &Column) -> Self {
        ColumnRef {
            name: column.name.clone(),
            ty: column.storage_ty.clone(),
        }
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Query> for Statement {
    fn from(value: Query) -> Self {
        Statement::Query(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
