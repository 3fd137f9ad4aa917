//! Projection of a schema definition onto one dialect's storage model.

use super::{
    app::{Field, FieldTag, FieldType, IndexDef, SchemaDef},
    db::{Column, ColumnDefault, Index, RenameHints, Table, Type},
    mapping, Dialect,
};
use crate::{stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// The engine-facing projection of a [`SchemaDef`].
///
/// Rebuilt whenever the definition changes and never persisted. Compiling the
/// same definition for the same dialect always yields an equal model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModel {
    pub reference: String,

    pub database: String,

    pub dialect: Dialect,

    pub table: Table,

    /// Field reference to column, in declaration order.
    pub fields: Vec<FieldMapping>,

    pub audit: AuditColumns,

    /// Conversion hooks keyed by column name, for columns whose abstract type
    /// the engine cannot store natively.
    pub hooks: IndexMap<String, ColumnHook>,

    /// `false` for imported or read-only schemas, whose tables are queried
    /// but never created or altered.
    pub managed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub reference: String,
    pub column: String,
    pub ty: FieldType,
}

/// Column names bound to the audit tags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditColumns {
    pub created: Option<String>,
    pub updated: Option<String>,
    pub deleted: Option<String>,
    pub version: Option<String>,
}

/// Serialize-on-write / deserialize-on-read conversion for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnHook {
    /// JSON documents stored as their text encoding.
    Json,
}

/// Compiles `schema` for `dialect`.
///
/// Compilation either fully succeeds or fails with the first problem found;
/// there is no partially compiled model.
pub fn compile(schema: &SchemaDef, dialect: Dialect) -> Result<CompiledModel> {
    Compiler::new(schema, dialect).compile()
}

struct Compiler<'a> {
    schema: &'a SchemaDef,
    dialect: Dialect,
}

impl<'a> Compiler<'a> {
    fn new(schema: &'a SchemaDef, dialect: Dialect) -> Self {
        Self { schema, dialect }
    }

    fn compile(&self) -> Result<CompiledModel> {
        self.validate()?;

        let table_name = self.schema.table_name().to_string();
        let mut table = Table::new(&table_name);
        let mut fields = Vec::with_capacity(self.schema.fields.len());
        let mut hooks = IndexMap::new();
        let mut audit = AuditColumns::default();

        let primary: Vec<&Field> = self.schema.fields.iter().filter(|f| f.is_primary()).collect();

        for field in &self.schema.fields {
            let (column, hook) = self.compile_field(field, &primary)?;

            if let Some(hook) = hook {
                hooks.insert(column.name.clone(), hook);
            }

            let name = column.name.clone();
            for (tag, slot) in [
                (FieldTag::Created, &mut audit.created),
                (FieldTag::Updated, &mut audit.updated),
                (FieldTag::Deleted, &mut audit.deleted),
                (FieldTag::Version, &mut audit.version),
            ] {
                if field.has_tag(tag) {
                    *slot = Some(name.clone());
                }
            }

            if column.primary_key {
                table.primary_key.push(table.columns.len());
            }

            fields.push(FieldMapping {
                reference: field.reference.clone(),
                column: name,
                ty: field.ty,
            });
            table.columns.push(column);
        }

        table.indices = self.compile_indices(&table_name)?;

        Ok(CompiledModel {
            reference: self.schema.reference.clone(),
            database: self.schema.database.clone(),
            dialect: self.dialect,
            table,
            fields,
            audit,
            hooks,
            managed: self.schema.is_managed(),
        })
    }

    fn validate(&self) -> Result<()> {
        let schema = self.schema;

        if schema.fields.is_empty() {
            return Err(self.invalid("schema has no fields"));
        }

        let mut references = HashSet::new();
        let mut columns = HashSet::new();

        for field in &schema.fields {
            if !references.insert(field.reference.as_str()) {
                return Err(self.invalid(format!("duplicate field `{}`", field.reference)));
            }

            if !columns.insert(field.column_name()) {
                return Err(self.invalid(format!(
                    "duplicate column `{}` (field `{}`)",
                    field.column_name(),
                    field.reference
                )));
            }

            if field.ty == FieldType::Enum && field.type_params.values.is_empty() {
                return Err(self.invalid(format!(
                    "enum field `{}` declares no values",
                    field.reference
                )));
            }
        }

        for tag in FieldTag::AUDIT {
            let count = schema.fields.iter().filter(|f| f.has_tag(tag)).count();
            if count > 1 {
                return Err(self.invalid(format!("{count} fields tagged {tag:?}; at most one allowed")));
            }
        }

        Ok(())
    }

    fn compile_field(
        &self,
        field: &Field,
        primary: &[&Field],
    ) -> Result<(Column, Option<ColumnHook>)> {
        let capability = self.dialect.capability();

        let mut storage_ty = mapping::to_engine_type(field, self.dialect)
            .map_err(|err| err.context(self.located(field)))?;

        let mut hook = None;
        if storage_ty.is_json() && !capability.native_json {
            storage_ty = Type::Text;
            hook = Some(ColumnHook::Json);
        }

        let is_primary = field.is_primary();
        let sole_primary = is_primary && primary.len() == 1;

        let mut column = Column::new(field.column_name(), storage_ty);
        column.primary_key = is_primary;
        // NULL marks a live row in a soft-deleting table.
        column.nullable = (field.is_nullable() || field.has_tag(FieldTag::Deleted)) && !is_primary;
        column.default = self.default_for(field, &column.storage_ty, hook.is_some());

        if sole_primary {
            match field.ty {
                FieldType::Uuid if column.default.is_none() => {
                    column.default = Some(ColumnDefault::Expr(capability.uuid_default.to_string()));
                }
                ty if ty.is_integer() => {
                    column.auto_increment = true;
                    column.default = None;
                }
                _ => {}
            }
        }

        Ok((column, hook))
    }

    fn default_for(&self, field: &Field, storage_ty: &Type, hooked: bool) -> Option<ColumnDefault> {
        match &field.default_value {
            Some(_) if hooked => Some(ColumnDefault::Value(Value::String(String::new()))),
            Some(value) => Some(ColumnDefault::Value(Value::from_json(value, storage_ty))),
            None if field.has_tag(FieldTag::Version) => Some(ColumnDefault::Value(Value::I64(0))),
            None if (field.has_tag(FieldTag::Created) || field.has_tag(FieldTag::Updated))
                && *storage_ty == Type::Timestamp =>
            {
                Some(ColumnDefault::Expr("CURRENT_TIMESTAMP".to_string()))
            }
            None => None,
        }
    }

    fn compile_indices(&self, table: &str) -> Result<Vec<Index>> {
        let mut indices: Vec<Index> = vec![];

        let tagged = |tag| {
            self.schema
                .fields
                .iter()
                .filter(move |f| f.has_tag(tag))
                .map(|f| IndexDef::new([f.reference.clone()]))
        };

        let uniques = tagged(FieldTag::Unique).chain(self.schema.uniques.iter().cloned());
        let plain = tagged(FieldTag::Index).chain(self.schema.indices.iter().cloned());

        for (def, unique) in uniques.map(|d| (d, true)).chain(plain.map(|d| (d, false))) {
            let index = self.compile_index(table, &def, unique)?;

            if !indices.iter().any(|existing| existing.name == index.name) {
                indices.push(index);
            }
        }

        Ok(indices)
    }

    fn compile_index(&self, table: &str, def: &IndexDef, unique: bool) -> Result<Index> {
        if def.fields.is_empty() {
            return Err(self.invalid("index declares no fields"));
        }

        let columns = def
            .fields
            .iter()
            .map(|reference| {
                self.schema
                    .field_by_reference(reference)
                    .map(|field| field.column_name().to_string())
                    .ok_or_else(|| {
                        self.invalid(format!("index references unknown field `{reference}`"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let name = match &def.name {
            Some(name) => name.clone(),
            None => {
                let prefix = if unique { "uq" } else { "ix" };
                format!("{prefix}_{table}_{}", columns.join("_"))
            }
        };

        Ok(Index {
            name,
            columns,
            unique,
        })
    }

    fn invalid(&self, message: impl std::fmt::Display) -> Error {
        Error::invalid_schema(format!(
            "{}/{}: {message}",
            self.schema.database, self.schema.reference
        ))
    }

    fn located(&self, field: &Field) -> Error {
        crate::err!(
            "compiling field `{}` of schema `{}`",
            field.reference,
            self.schema.reference
        )
    }
}

impl CompiledModel {
    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    pub fn field(&self, reference: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.reference == reference)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.column(name)
    }

    pub fn hook(&self, column: &str) -> Option<ColumnHook> {
        self.hooks.get(column).copied()
    }

    /// Column renames between `previous` and `self`, matched by field
    /// reference.
    pub fn rename_hints(&self, previous: &CompiledModel) -> RenameHints {
        let mut hints = RenameHints::new();

        for field in &self.fields {
            if let Some(before) = previous.field(&field.reference) {
                if before.column != field.column {
                    hints.add_column_hint(&before.column, &field.column);
                }
            }
        }

        hints
    }
}

impl ColumnHook {
    /// Encodes an application value for storage.
    pub fn serialize(self, value: &serde_json::Value) -> Value {
        match self {
            ColumnHook::Json if value.is_null() => Value::Null,
            ColumnHook::Json => Value::String(value.to_string()),
        }
    }

    /// Decodes a stored value. The empty string, used as the default of
    /// emulated JSON columns, decodes to `null`.
    pub fn deserialize(self, value: Value) -> Result<serde_json::Value> {
        match (self, value) {
            (ColumnHook::Json, Value::String(text)) if text.is_empty() => {
                Ok(serde_json::Value::Null)
            }
            (ColumnHook::Json, Value::String(text)) => Ok(serde_json::from_str(&text)?),
            (ColumnHook::Json, other) => Ok(other.to_json()),
        }
    }
}
