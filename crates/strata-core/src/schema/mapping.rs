//! Translation between abstract field types and engine storage types.

use super::{
    app::{Field, FieldType, TypeParams},
    db::Type,
    Dialect,
};
use crate::Result;

/// Maps an abstract field onto the storage type of `dialect`.
///
/// Type parameters pass through verbatim. JSON types always map to the
/// ideal native type; substituting text on engines without native JSON is
/// the model compiler's job.
pub fn to_engine_type(field: &Field, dialect: Dialect) -> Result<Type> {
    let params = &field.type_params;
    let capability = dialect.capability();

    let integer = |bytes| Type::Integer {
        bytes,
        unsigned: params.unsigned,
        zerofill: params.zerofill,
        width: params.length,
    };

    let length = params
        .length
        .map(u64::from)
        .unwrap_or(capability.default_string_length);

    // Engine-specific extras: native on postgres, nearest portable type
    // elsewhere.
    let native_or = |name: &str, portable: Type| match dialect {
        Dialect::Postgres => Type::Custom(name.to_string()),
        Dialect::Mysql | Dialect::Sqlite => portable,
    };

    Ok(match field.ty {
        FieldType::Boolean => Type::Boolean,
        FieldType::Tinyint => integer(1),
        FieldType::Smallint => integer(2),
        FieldType::Mediumint => integer(3),
        FieldType::Integer => integer(4),
        FieldType::Bigint => integer(8),
        FieldType::Float | FieldType::Real => Type::Float(4),
        FieldType::Double => Type::Float(8),
        FieldType::Decimal => Type::Numeric(
            params
                .precision
                .map(|precision| (precision, params.scale.unwrap_or(0))),
        ),
        FieldType::Char => Type::Char {
            length,
            binary: params.binary,
        },
        FieldType::String => Type::VarChar {
            length,
            binary: params.binary,
        },
        FieldType::Text => Type::Text,
        FieldType::Citext => native_or("CITEXT", Type::Text),
        FieldType::Tsvector => native_or("TSVECTOR", Type::Text),
        FieldType::Blob => Type::Blob,
        FieldType::Date => Type::Timestamp,
        FieldType::DateOnly => Type::Date,
        FieldType::Time => Type::Time,
        FieldType::Uuid => Type::Uuid,
        FieldType::Json => Type::Json,
        FieldType::Jsonb => Type::Jsonb,
        FieldType::Enum => Type::Enum(params.values.clone()),
        FieldType::Inet => native_or("INET", Type::varchar(45)),
        FieldType::Cidr => native_or("CIDR", Type::varchar(49)),
        FieldType::Macaddr => native_or("MACADDR", Type::varchar(17)),
    })
}

/// Parses a normalized engine type string back into an abstract type.
///
/// `raw` is upper-cased as reported by the catalog. A non-empty
/// `enum_values` yields `ENUM` regardless of the raw string. Returns `None`
/// when no rule matches; the caller decides the policy.
pub fn from_engine_type(raw: &str, enum_values: &[String]) -> Option<(FieldType, TypeParams)> {
    if !enum_values.is_empty() {
        return Some((FieldType::Enum, TypeParams::values(enum_values.iter().cloned())));
    }

    let raw = raw.trim();

    if let Some(ty) = exact(raw) {
        return Some((ty, TypeParams::default()));
    }

    parameterized(raw)
}

fn exact(raw: &str) -> Option<FieldType> {
    Some(match raw {
        "BOOLEAN" | "BOOL" | "TINYINT(1)" => FieldType::Boolean,
        "UUID" => FieldType::Uuid,
        "JSON" => FieldType::Json,
        "JSONB" => FieldType::Jsonb,
        "INET" => FieldType::Inet,
        "CIDR" => FieldType::Cidr,
        "MACADDR" => FieldType::Macaddr,
        "CITEXT" => FieldType::Citext,
        "TSVECTOR" => FieldType::Tsvector,
        "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "CLOB" => FieldType::Text,
        "CHARACTER VARYING" | "VARCHAR" => FieldType::String,
        "CHARACTER" | "CHAR" => FieldType::Char,
        "TINYINT" => FieldType::Tinyint,
        "SMALLINT" | "INT2" => FieldType::Smallint,
        "MEDIUMINT" => FieldType::Mediumint,
        "INTEGER" | "INT" | "INT4" => FieldType::Integer,
        "BIGINT" | "INT8" => FieldType::Bigint,
        "FLOAT" => FieldType::Float,
        "REAL" | "FLOAT4" => FieldType::Real,
        "DOUBLE PRECISION" | "DOUBLE" | "FLOAT8" => FieldType::Double,
        "NUMERIC" | "DECIMAL" => FieldType::Decimal,
        "BYTEA" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => FieldType::Blob,
        "DATE" => FieldType::DateOnly,
        "TIME" | "TIME WITHOUT TIME ZONE" | "TIME WITH TIME ZONE" => FieldType::Time,
        "TIMESTAMP"
        | "TIMESTAMP WITH TIME ZONE"
        | "TIMESTAMP WITHOUT TIME ZONE"
        | "TIMESTAMPTZ"
        | "DATETIME" => FieldType::Date,
        _ => return None,
    })
}

fn parameterized(raw: &str) -> Option<(FieldType, TypeParams)> {
    let (name, args) = split_args(raw)?;

    match name {
        "CHARACTER VARYING" | "VARCHAR" => {
            Some((FieldType::String, TypeParams::length(single(args)?)))
        }
        "CHARACTER" | "CHAR" => Some((FieldType::Char, TypeParams::length(single(args)?))),
        "NUMERIC" | "DECIMAL" => {
            let mut parts = args.split(',').map(|part| part.trim().parse::<u32>());
            let precision = parts.next()?.ok()?;
            let scale = match parts.next() {
                Some(scale) => scale.ok()?,
                None => 0,
            };
            if parts.next().is_some() {
                return None;
            }
            Some((FieldType::Decimal, TypeParams::decimal(precision, scale)))
        }
        _ => None,
    }
}

/// Splits `NAME(args)` into its name and argument list.
fn split_args(raw: &str) -> Option<(&str, &str)> {
    let (name, rest) = raw.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    Some((name.trim(), args))
}

fn single(args: &str) -> Option<u32> {
    args.trim().parse().ok()
}
