use strata_core::{schema::db, stmt};

/// Collects the values bound to a statement's placeholders.
pub trait Params {
    fn push(&mut self, param: &stmt::Value, ty: Option<&db::Type>) -> Placeholder;
}

pub struct Placeholder(pub usize);

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value, _ty: Option<&db::Type>) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}
