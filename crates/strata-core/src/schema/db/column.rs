use super::{RenameHints, Type};
use crate::stmt;

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The database storage type of the column.
    pub storage_ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    /// True if the column is an integer that should be auto-incremented
    /// with each insertion of a new row.
    pub auto_increment: bool,

    /// Value assigned by the engine when an insert omits the column.
    pub default: Option<ColumnDefault>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    /// A literal, rendered as a SQL literal of the column's type.
    Value(stmt::Value),

    /// A raw SQL expression such as `gen_random_uuid()`.
    Expr(String),
}

impl Column {
    pub fn new(name: impl Into<String>, storage_ty: Type) -> Column {
        Column {
            name: name.into(),
            storage_ty,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            default: None,
        }
    }

    fn has_diff(&self, other: &Column) -> bool {
        self.name != other.name
            || self.storage_ty != other.storage_ty
            || self.nullable != other.nullable
            || self.primary_key != other.primary_key
            || self.auto_increment != other.auto_increment
            || self.default != other.default
    }
}

pub struct ColumnsDiff<'a> {
    items: Vec<ColumnsDiffItem<'a>>,
}

impl<'a> ColumnsDiff<'a> {
    pub fn from(from: &'a [Column], to: &'a [Column], hints: &RenameHints) -> Self {
        let mut items = vec![];

        let to_map =
            HashMap::<&str, &'a Column>::from_iter(to.iter().map(|to| (to.name.as_str(), to)));

        let mut matched = HashSet::<&str>::new();

        for from in from {
            let to_name = hints.column(&from.name).unwrap_or(from.name.as_str());

            match to_map.get(to_name) {
                Some(to) => {
                    matched.insert(to.name.as_str());
                    if from.has_diff(to) {
                        items.push(ColumnsDiffItem::AlterColumn { from, to });
                    }
                }
                None => items.push(ColumnsDiffItem::DropColumn(from)),
            }
        }

        for to in to {
            if !matched.contains(to.name.as_str()) {
                items.push(ColumnsDiffItem::AddColumn(to));
            }
        }

        Self { items }
    }

    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnsDiffItem<'a>> {
        self.items.iter()
    }

    /// Returns `true` if any existing column changes in place.
    pub fn has_alterations(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, ColumnsDiffItem::AlterColumn { .. }))
    }
}

#[derive(Debug)]
pub enum ColumnsDiffItem<'a> {
    AddColumn(&'a Column),
    DropColumn(&'a Column),
    AlterColumn { from: &'a Column, to: &'a Column },
}
