use crate::Error;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Abstract, engine-neutral field type.
///
/// The names match the upper-case identifiers used in schema documents
/// (`"STRING"`, `"DATEONLY"`, ...). Parsing an unknown name fails with
/// [`Error::unsupported_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Boolean,
    Tinyint,
    Smallint,
    Mediumint,
    Integer,
    Bigint,
    Float,
    Real,
    Double,
    Decimal,
    Char,
    String,
    Text,
    Citext,
    Tsvector,
    Blob,
    /// Date and time of day with time zone.
    Date,
    /// Calendar date without a time component.
    DateOnly,
    Time,
    Uuid,
    Json,
    Jsonb,
    Enum,
    Inet,
    Cidr,
    Macaddr,
}

impl FieldType {
    /// Every abstract type, in declaration order.
    pub const ALL: [FieldType; 26] = [
        FieldType::Boolean,
        FieldType::Tinyint,
        FieldType::Smallint,
        FieldType::Mediumint,
        FieldType::Integer,
        FieldType::Bigint,
        FieldType::Float,
        FieldType::Real,
        FieldType::Double,
        FieldType::Decimal,
        FieldType::Char,
        FieldType::String,
        FieldType::Text,
        FieldType::Citext,
        FieldType::Tsvector,
        FieldType::Blob,
        FieldType::Date,
        FieldType::DateOnly,
        FieldType::Time,
        FieldType::Uuid,
        FieldType::Json,
        FieldType::Jsonb,
        FieldType::Enum,
        FieldType::Inet,
        FieldType::Cidr,
        FieldType::Macaddr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Boolean => "BOOLEAN",
            FieldType::Tinyint => "TINYINT",
            FieldType::Smallint => "SMALLINT",
            FieldType::Mediumint => "MEDIUMINT",
            FieldType::Integer => "INTEGER",
            FieldType::Bigint => "BIGINT",
            FieldType::Float => "FLOAT",
            FieldType::Real => "REAL",
            FieldType::Double => "DOUBLE",
            FieldType::Decimal => "DECIMAL",
            FieldType::Char => "CHAR",
            FieldType::String => "STRING",
            FieldType::Text => "TEXT",
            FieldType::Citext => "CITEXT",
            FieldType::Tsvector => "TSVECTOR",
            FieldType::Blob => "BLOB",
            FieldType::Date => "DATE",
            FieldType::DateOnly => "DATEONLY",
            FieldType::Time => "TIME",
            FieldType::Uuid => "UUID",
            FieldType::Json => "JSON",
            FieldType::Jsonb => "JSONB",
            FieldType::Enum => "ENUM",
            FieldType::Inet => "INET",
            FieldType::Cidr => "CIDR",
            FieldType::Macaddr => "MACADDR",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldType::Tinyint
                | FieldType::Smallint
                | FieldType::Mediumint
                | FieldType::Integer
                | FieldType::Bigint
        )
    }

    pub fn is_json(self) -> bool {
        matches!(self, FieldType::Json | FieldType::Jsonb)
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::unsupported_type(s))
    }
}

impl TryFrom<String> for FieldType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
