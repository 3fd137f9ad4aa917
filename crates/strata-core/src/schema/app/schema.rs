use super::{Field, FieldType, IndexDef, Relation};
use crate::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema tag marking definitions that belong to the bootstrap database.
pub const TAG_SYSTEM: &str = "system";

/// Schema tag marking definitions produced by discovery.
pub const TAG_IMPORTED: &str = "imported";

/// Schema tag marking definitions that must never be created or altered.
pub const TAG_READONLY: &str = "readonly";

/// Abstract, engine-neutral description of one data entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDef {
    /// Stable logical identifier, unique per database.
    pub reference: String,

    /// Name of the owning database.
    pub database: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Physical table name. Defaults to `reference`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub relations: Vec<Relation>,

    #[serde(default)]
    pub indices: Vec<IndexDef>,

    #[serde(default)]
    pub uniques: Vec<IndexDef>,
}

/// Registry key of a schema: `(database, reference)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaKey {
    pub database: String,
    pub reference: String,
}

impl SchemaDef {
    pub fn new(database: impl Into<String>, reference: impl Into<String>) -> SchemaDef {
        SchemaDef {
            reference: reference.into(),
            database: database.into(),
            label: None,
            table_name: None,
            tags: vec![],
            fields: vec![],
            relations: vec![],
            indices: vec![],
            uniques: vec![],
        }
    }

    /// Parses a schema document.
    ///
    /// Unlike a plain `serde_json::from_value`, an unknown field type is
    /// reported as [`Error::unsupported_type_at`] naming the schema and the
    /// field, so callers can classify the failure.
    pub fn from_json(value: serde_json::Value) -> Result<SchemaDef> {
        let reference = value
            .get("reference")
            .and_then(|v| v.as_str())
            .unwrap_or("<unnamed>");

        if let Some(fields) = value.get("fields").and_then(|v| v.as_array()) {
            for field in fields {
                let Some(ty) = field.get("type").and_then(|v| v.as_str()) else {
                    continue;
                };

                if ty.parse::<FieldType>().is_err() {
                    let name = field
                        .get("reference")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<unnamed>");
                    return Err(Error::unsupported_type_at(ty, reference, name));
                }
            }
        }

        serde_json::from_value(value)
            .map_err(|err| Error::invalid_schema(format!("malformed schema document: {err}")))
    }

    pub fn field(mut self, field: Field) -> SchemaDef {
        self.fields.push(field);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> SchemaDef {
        self.tags.push(tag.into());
        self
    }

    pub fn table(mut self, name: impl Into<String>) -> SchemaDef {
        self.table_name = Some(name.into());
        self
    }

    pub fn index(mut self, index: IndexDef) -> SchemaDef {
        self.indices.push(index);
        self
    }

    pub fn unique(mut self, unique: IndexDef) -> SchemaDef {
        self.uniques.push(unique);
        self
    }

    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.database, &self.reference)
    }

    pub fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.reference)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns `true` when the schema's table is owned by the platform, i.e.
    /// it may be created and altered.
    pub fn is_managed(&self) -> bool {
        !self.has_tag(TAG_IMPORTED) && !self.has_tag(TAG_READONLY)
    }

    pub fn field_by_reference(&self, reference: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.reference == reference)
    }
}

impl SchemaKey {
    pub fn new(database: impl Into<String>, reference: impl Into<String>) -> SchemaKey {
        SchemaKey {
            database: database.into(),
            reference: reference.into(),
        }
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.reference)
    }
}
