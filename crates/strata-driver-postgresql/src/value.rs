use strata_core::{stmt::Value as CoreValue, Error, Result};
use tokio_postgres::{
    types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type},
    Column, Row,
};

#[derive(Debug)]
pub struct Value(pub(crate) CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// The wire type a value is sent as. Placeholders carry a cast to the
    /// column type, so text is a safe carrier for everything without a
    /// direct binary form.
    pub(crate) fn postgres_ty(&self) -> Type {
        match &self.0 {
            CoreValue::Bool(_) => Type::BOOL,
            CoreValue::I64(_) => Type::INT8,
            CoreValue::F64(_) => Type::FLOAT8,
            CoreValue::Bytes(_) => Type::BYTEA,
            CoreValue::String(_) | CoreValue::Json(_) | CoreValue::Null => Type::TEXT,
        }
    }

    /// Converts a PostgreSQL value within a row to a Strata value.
    pub(crate) fn from_row(row: &Row, index: usize, column: &Column) -> Result<CoreValue> {
        // NOTE: the inner representation of the PostgreSQL type enum is not
        // accessible, so each type is matched by hand.
        let ty = column.type_();

        let value = if *ty == Type::BOOL {
            get::<bool>(row, index)?.map(CoreValue::Bool)
        } else if *ty == Type::INT2 {
            get::<i16>(row, index)?.map(|v| CoreValue::I64(v.into()))
        } else if *ty == Type::INT4 {
            get::<i32>(row, index)?.map(|v| CoreValue::I64(v.into()))
        } else if *ty == Type::INT8 {
            get::<i64>(row, index)?.map(CoreValue::I64)
        } else if *ty == Type::FLOAT4 {
            get::<f32>(row, index)?.map(|v| CoreValue::F64(v.into()))
        } else if *ty == Type::FLOAT8 {
            get::<f64>(row, index)?.map(CoreValue::F64)
        } else if *ty == Type::BYTEA {
            get::<Vec<u8>>(row, index)?.map(CoreValue::Bytes)
        } else if *ty == Type::JSON || *ty == Type::JSONB {
            get::<serde_json::Value>(row, index)?.map(CoreValue::Json)
        } else if *ty == Type::TEXT
            || *ty == Type::VARCHAR
            || *ty == Type::BPCHAR
            || *ty == Type::NAME
        {
            get::<String>(row, index)?.map(CoreValue::String)
        } else {
            return Err(strata_core::err!(
                "unsupported PostgreSQL column type `{}` for column `{}`",
                ty,
                column.name()
            ));
        };

        Ok(value.unwrap_or(CoreValue::Null))
    }
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(row: &'a Row, index: usize) -> Result<Option<T>> {
    row.try_get::<usize, Option<T>>(index)
        .map_err(Error::driver_operation_failed)
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => value.to_sql(ty, out),
            CoreValue::F64(value) => value.to_sql(ty, out),
            CoreValue::String(value) => value.to_sql(ty, out),
            CoreValue::Bytes(value) => value.to_sql(ty, out),
            CoreValue::Json(value) => value.to_string().to_sql(ty, out),
            CoreValue::Null => Ok(IsNull::Yes),
        }
    }

    accepts!(BOOL, INT8, FLOAT8, TEXT, BYTEA);
    to_sql_checked!();
}
