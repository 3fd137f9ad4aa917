use mysql_async::{prelude::ToValue, Value as MySqlValue};
use strata_core::{schema::db::Type, stmt::Value as CoreValue, Error, Result};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts a MySQL value to a Strata value, guided by the column's
    /// storage type.
    pub(crate) fn from_sql(value: MySqlValue, ty: &Type) -> Result<CoreValue> {
        Ok(match value {
            MySqlValue::NULL => CoreValue::Null,
            MySqlValue::Int(v) => match ty {
                Type::Boolean => CoreValue::Bool(v != 0),
                Type::Float(_) => CoreValue::F64(v as f64),
                _ => CoreValue::I64(v),
            },
            MySqlValue::UInt(v) => match ty {
                Type::Boolean => CoreValue::Bool(v != 0),
                _ => CoreValue::I64(i64::try_from(v).map_err(Error::driver_operation_failed)?),
            },
            MySqlValue::Float(v) => CoreValue::F64(v.into()),
            MySqlValue::Double(v) => CoreValue::F64(v),
            MySqlValue::Bytes(bytes) => match ty {
                Type::Blob => CoreValue::Bytes(bytes),
                Type::Json | Type::Jsonb => CoreValue::Json(serde_json::from_slice(&bytes)?),
                _ => {
                    let text = String::from_utf8(bytes).map_err(Error::driver_operation_failed)?;
                    match ty {
                        Type::Boolean => CoreValue::Bool(text != "0"),
                        Type::Integer { .. } => CoreValue::I64(
                            text.parse().map_err(Error::driver_operation_failed)?,
                        ),
                        Type::Float(_) => CoreValue::F64(
                            text.parse().map_err(Error::driver_operation_failed)?,
                        ),
                        _ => CoreValue::String(text),
                    }
                }
            },
            MySqlValue::Date(year, month, day, hour, minute, second, micros) => match ty {
                Type::Date => CoreValue::String(format!("{year:04}-{month:02}-{day:02}")),
                _ => CoreValue::String(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}{}",
                    fraction(micros)
                )),
            },
            MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = days * 24 + u32::from(hours);
                CoreValue::String(format!(
                    "{sign}{hours:02}:{minutes:02}:{seconds:02}{}",
                    fraction(micros)
                ))
            }
        })
    }
}

fn fraction(micros: u32) -> String {
    if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    }
}

impl ToValue for Value {
    fn to_value(&self) -> MySqlValue {
        match &self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => value.to_value(),
            CoreValue::Json(value) => value.to_string().to_value(),
            CoreValue::Null => MySqlValue::NULL,
        }
    }
}
