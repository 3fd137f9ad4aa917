use std::collections::HashMap;

/// A named secondary index or unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name is unique within the database
    pub name: String,

    /// Names of the indexed columns, in order.
    pub columns: Vec<String>,

    /// When `true`, indexed entries are unique
    pub unique: bool,
}

impl Index {
    fn has_diff(&self, other: &Index) -> bool {
        self.columns != other.columns || self.unique != other.unique
    }
}

pub struct IndicesDiff<'a> {
    items: Vec<IndicesDiffItem<'a>>,
}

impl<'a> IndicesDiff<'a> {
    pub fn from(from: &'a [Index], to: &'a [Index]) -> Self {
        let mut items = vec![];

        let from_map =
            HashMap::<&str, &'a Index>::from_iter(from.iter().map(|i| (i.name.as_str(), i)));
        let to_map = HashMap::<&str, &'a Index>::from_iter(to.iter().map(|i| (i.name.as_str(), i)));

        for from in from {
            match to_map.get(from.name.as_str()) {
                Some(to) if from.has_diff(to) => {
                    items.push(IndicesDiffItem::DropIndex(from));
                    items.push(IndicesDiffItem::CreateIndex(to));
                }
                Some(_) => {}
                None => items.push(IndicesDiffItem::DropIndex(from)),
            }
        }

        for to in to {
            if !from_map.contains_key(to.name.as_str()) {
                items.push(IndicesDiffItem::CreateIndex(to));
            }
        }

        Self { items }
    }

    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicesDiffItem<'a>> {
        self.items.iter()
    }
}

#[derive(Debug)]
pub enum IndicesDiffItem<'a> {
    CreateIndex(&'a Index),
    DropIndex(&'a Index),
}
