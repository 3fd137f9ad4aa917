use super::FieldType;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One column's abstract description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Stable logical name, immutable once created.
    pub reference: String,

    /// Physical column name. Defaults to `reference`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type")]
    pub ty: FieldType,

    #[serde(default, skip_serializing_if = "TypeParams::is_empty")]
    pub type_params: TypeParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<FieldTag>,
}

/// Parameters for parameterized abstract types.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Allowed values of an `ENUM` field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unsigned: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub zerofill: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,
}

/// Behavioral marker attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldTag {
    Primary,
    Unique,
    Nullable,
    Index,
    /// Set to the insert timestamp.
    Created,
    /// Set to the timestamp of the latest write.
    Updated,
    /// Soft-delete marker.
    Deleted,
    /// Optimistic-lock counter.
    Version,
    Tags,
}

impl FieldTag {
    /// Tags that bind a field to an automatic lifecycle behavior. A schema may
    /// carry each of them at most once.
    pub const AUDIT: [FieldTag; 4] = [
        FieldTag::Created,
        FieldTag::Updated,
        FieldTag::Deleted,
        FieldTag::Version,
    ];
}

impl Field {
    pub fn new(reference: impl Into<String>, ty: FieldType) -> Field {
        Field {
            reference: reference.into(),
            column_name: None,
            label: None,
            ty,
            type_params: TypeParams::default(),
            default_value: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn tag(mut self, tag: FieldTag) -> Field {
        self.tags.insert(tag);
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> Field {
        self.column_name = Some(name.into());
        self
    }

    pub fn params(mut self, params: TypeParams) -> Field {
        self.type_params = params;
        self
    }

    pub fn default_value(mut self, value: serde_json::Value) -> Field {
        self.default_value = Some(value);
        self
    }

    pub fn column_name(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.reference)
    }

    pub fn has_tag(&self, tag: FieldTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_nullable(&self) -> bool {
        self.has_tag(FieldTag::Nullable)
    }

    pub fn is_primary(&self) -> bool {
        self.has_tag(FieldTag::Primary)
    }
}

impl TypeParams {
    pub fn length(length: u32) -> TypeParams {
        TypeParams {
            length: Some(length),
            ..TypeParams::default()
        }
    }

    pub fn decimal(precision: u32, scale: u32) -> TypeParams {
        TypeParams {
            precision: Some(precision),
            scale: Some(scale),
            ..TypeParams::default()
        }
    }

    pub fn values<I, S>(values: I) -> TypeParams
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeParams {
            values: values.into_iter().map(Into::into).collect(),
            ..TypeParams::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TypeParams::default()
    }
}
