use super::{ColumnDef, Name, Statement};

use strata_core::schema::db::{Column, ColumnDefault, Type};

/// A statement to alter a column in a table.
#[derive(Debug, Clone)]
pub struct AlterColumn {
    /// Name of the table containing the column.
    pub table: Name,

    /// Current column definition.
    pub column_def: ColumnDef,

    /// Changes to apply to the column.
    pub changes: AlterColumnChanges,
}

/// Column properties that change. `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterColumnChanges {
    /// New name for the column (if renaming).
    pub new_name: Option<String>,

    /// New type information.
    pub new_ty: Option<Type>,

    /// New nullability constraint.
    pub new_not_null: Option<bool>,

    /// New auto increment behavior.
    pub new_auto_increment: Option<bool>,

    /// New default. `Some(None)` drops the default.
    pub new_default: Option<Option<ColumnDefault>>,
}

impl AlterColumnChanges {
    pub fn from_diff(from: &Column, to: &Column) -> Self {
        AlterColumnChanges {
            new_name: (from.name != to.name).then(|| to.name.clone()),
            new_ty: (from.storage_ty != to.storage_ty).then(|| to.storage_ty.clone()),
            new_not_null: (from.nullable != to.nullable).then_some(!to.nullable),
            new_auto_increment: (from.auto_increment != to.auto_increment)
                .then_some(to.auto_increment),
            new_default: (from.default != to.default).then(|| to.default.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == AlterColumnChanges::default()
    }

    pub fn has_type_change(&self) -> bool {
        self.new_ty.is_some()
    }

    /// Splits the changes into one set per property, in the order the
    /// statements must run. The rename comes last so the other statements
    /// address the column by its current name.
    pub fn split(self) -> Vec<Self> {
        let Self {
            new_name,
            new_ty,
            new_not_null,
            new_auto_increment,
            new_default,
        } = self;

        let mut result = vec![];

        // A default incompatible with the new type must go first.
        if let Some(new_default) = new_default.clone() {
            if new_default.is_none() || new_ty.is_none() {
                result.push(Self {
                    new_default: Some(new_default),
                    ..Default::default()
                });
            }
        }
        if new_ty.is_some() {
            result.push(Self {
                new_ty,
                ..Default::default()
            });
            if let Some(Some(default)) = new_default {
                result.push(Self {
                    new_default: Some(Some(default)),
                    ..Default::default()
                });
            }
        }
        if new_not_null.is_some() {
            result.push(Self {
                new_not_null,
                ..Default::default()
            });
        }
        if new_auto_increment.is_some() {
            result.push(Self {
                new_auto_increment,
                ..Default::default()
            });
        }
        if new_name.is_some() {
            result.push(Self {
                new_name,
                ..Default::default()
            });
        }
        result
    }
}

impl Statement {
    /// Alters a column from its current definition `from`.
    pub fn alter_column(table: &str, from: &Column, changes: AlterColumnChanges) -> Self {
        AlterColumn {
            table: Name::from(table),
            column_def: ColumnDef::from_schema(from),
            changes,
        }
        .into()
    }
}

impl From<AlterColumn> for Statement {
    fn from(value: AlterColumn) -> Self {
        Self::AlterColumn(value)
    }
}
