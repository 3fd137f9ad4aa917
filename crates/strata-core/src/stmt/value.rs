use crate::schema::db::Type;

/// A single column value crossing the driver boundary.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point number
    F64(f64),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// A structured JSON document, for columns with a native JSON type.
    Json(serde_json::Value),
}

/// One row, in the order of the statement's columns.
pub type ValueRecord = Vec<Value>;

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts an application-level JSON value into the representation a
    /// column of type `ty` expects.
    pub fn from_json(value: &serde_json::Value, ty: &Type) -> Value {
        use serde_json::Value as Json;

        if value.is_null() {
            return Value::Null;
        }

        if ty.is_json() {
            return Value::Json(value.clone());
        }

        match value {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Bool(*v),
            Json::Number(n) => match n.as_i64() {
                Some(v) if !matches!(ty, Type::Float(_)) => Value::I64(v),
                _ => n.as_f64().map(Value::F64).unwrap_or(Value::Null),
            },
            Json::String(v) => match ty {
                Type::Blob => Value::Bytes(v.clone().into_bytes()),
                _ => Value::String(v.clone()),
            },
            Json::Array(_) | Json::Object(_) => Value::String(value.to_string()),
        }
    }

    /// Converts the value back into its application-level JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Bool(v) => Json::Bool(*v),
            Value::I64(v) => Json::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Null => Json::Null,
            Value::String(v) => Json::String(v.clone()),
            Value::Bytes(v) => match std::str::from_utf8(v) {
                Ok(s) => Json::String(s.to_string()),
                Err(_) => Json::from(v.clone()),
            },
            Value::Json(v) => v.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
