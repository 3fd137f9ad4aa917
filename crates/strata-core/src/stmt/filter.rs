use super::{ColumnRef, Value};

/// Conjunction of conditions. An empty filter matches every row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(ColumnRef, Value),
    IsNull(ColumnRef),
}

impl Filter {
    pub fn all() -> Filter {
        Filter::default()
    }

    pub fn eq(mut self, column: ColumnRef, value: Value) -> Filter {
        self.conditions.push(Condition::Eq(column, value));
        self
    }

    pub fn is_null(mut self, column: ColumnRef) -> Filter {
        self.conditions.push(Condition::IsNull(column));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
