//! Minimal row access over a tracked model.
//!
//! Records are JSON objects keyed by field reference. Audit columns, JSON
//! hooks and client-side UUID keys are handled here so callers only deal in
//! application values.

use crate::{link::Link, Error, Result};

use serde_json::{json, Value as Json};
use std::sync::Arc;
use strata_core::{
    driver::{Response, Rows},
    schema::{app::FieldType, CompiledModel, FieldMapping},
    stmt::{ColumnRef, Delete, Filter, Insert, Query, Statement, Update, Value, ValueRecord},
};

/// One row, keyed by field reference.
pub type Record = serde_json::Map<String, Json>;

/// Row operations on one model of one link.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    link: Link,
    model: Arc<CompiledModel>,
}

impl ModelHandle {
    pub(crate) fn new(link: Link, model: Arc<CompiledModel>) -> ModelHandle {
        ModelHandle { link, model }
    }

    pub fn model(&self) -> &CompiledModel {
        &self.model
    }

    /// Inserts `record` and returns the row as stored.
    ///
    /// Missing audit values are filled in: CREATED and UPDATED get the current
    /// time, VERSION starts at 0. A missing sole UUID primary key is generated
    /// here; a missing auto-increment key is read back from the engine.
    pub async fn create(&self, mut record: Record) -> Result<Record> {
        self.check_fields(&record)?;

        let now = Json::String(timestamp());
        let audit = &self.model.audit;

        for column in [&audit.created, &audit.updated].into_iter().flatten() {
            fill(&mut record, self.reference_of(column), now.clone());
        }

        if let Some(column) = &audit.version {
            fill(&mut record, self.reference_of(column), json!(0));
        }

        if let [field] = self.primary_fields().as_slice() {
            if field.ty == FieldType::Uuid {
                fill(
                    &mut record,
                    Some(&field.reference),
                    Json::String(uuid::Uuid::new_v4().to_string()),
                );
            }
        }

        let mut columns = vec![];
        let mut values = vec![];

        for field in &self.model.fields {
            if let Some(value) = record.get(&field.reference) {
                columns.push(self.column_ref(&field.column));
                values.push(self.encode(field, value));
            }
        }

        let returning = self
            .model
            .table
            .auto_increment_column()
            .filter(|column| {
                self.field_of(&column.name)
                    .is_some_and(|field| !record.contains_key(&field.reference))
            })
            .map(|column| self.column_ref(&column.name));

        let stmt = Insert {
            table: self.model.table_name().to_string(),
            columns,
            values,
            returning: returning.clone(),
        };

        let response = self.link.exec(Statement::Insert(stmt)).await?;

        if let Some(returning) = returning {
            let generated = response
                .rows
                .into_values()
                .into_iter()
                .next()
                .and_then(|row| row.into_iter().next())
                .ok_or_else(|| {
                    strata_core::err!(
                        "insert into `{}` did not report the generated key",
                        self.model.table_name()
                    )
                })?;

            if let Some(field) = self.field_of(&returning.name) {
                record.insert(field.reference.clone(), self.decode_value(field, generated)?);
            }
        }

        let mut key = Record::new();
        for field in self.primary_fields() {
            match record.get(&field.reference) {
                Some(value) => key.insert(field.reference.clone(), value.clone()),
                None => return Ok(record),
            };
        }

        if key.is_empty() {
            return Ok(record);
        }

        Ok(self.find(key).await?.into_iter().next().unwrap_or(record))
    }

    /// Every live row.
    pub async fn all(&self) -> Result<Vec<Record>> {
        self.find(Record::new()).await
    }

    /// Rows whose fields equal every entry of `conditions`. A `null` entry
    /// matches missing values. Soft-deleted rows are never returned.
    pub async fn find(&self, conditions: Record) -> Result<Vec<Record>> {
        let stmt = Query {
            table: self.model.table_name().to_string(),
            columns: self
                .model
                .fields
                .iter()
                .map(|field| self.column_ref(&field.column))
                .collect(),
            filter: self.filter(&conditions)?,
        };

        let response = self.link.exec(Statement::Query(stmt)).await?;

        response
            .rows
            .into_values()
            .into_iter()
            .map(|row| self.decode(row))
            .collect()
    }

    /// Sets the fields of `values` on the live rows matching `conditions`
    /// and returns how many were affected. UPDATED gets the current time
    /// unless `values` carries it.
    pub async fn update(&self, conditions: Record, mut values: Record) -> Result<u64> {
        self.check_fields(&values)?;
        let filter = self.filter(&conditions)?;

        if let Some(column) = &self.model.audit.updated {
            fill(&mut values, self.reference_of(column), Json::String(timestamp()));
        }

        let assignments: Vec<_> = self
            .model
            .fields
            .iter()
            .filter_map(|field| {
                let value = values.get(&field.reference)?;
                Some((self.column_ref(&field.column), self.encode(field, value)))
            })
            .collect();

        if assignments.is_empty() {
            return Err(Error::invalid_schema(format!(
                "nothing to update in schema `{}`",
                self.model.reference
            )));
        }

        let stmt = Statement::Update(Update {
            table: self.model.table_name().to_string(),
            assignments,
            filter,
        });

        Ok(affected(self.link.exec(stmt).await?))
    }

    /// Deletes the rows matching `conditions` and returns how many were
    /// affected. Models with a DELETED field are soft deleted: the marker is
    /// set to the current time and the row stays in the table.
    pub async fn delete(&self, conditions: Record) -> Result<u64> {
        let filter = self.filter(&conditions)?;
        let table = self.model.table_name().to_string();

        let stmt = match &self.model.audit.deleted {
            Some(deleted) => {
                let now = Value::String(timestamp());
                let mut assignments = vec![(self.column_ref(deleted), now.clone())];

                if let Some(updated) = &self.model.audit.updated {
                    assignments.push((self.column_ref(updated), now));
                }

                Statement::Update(Update {
                    table,
                    assignments,
                    filter,
                })
            }
            None => Statement::Delete(Delete { table, filter }),
        };

        Ok(affected(self.link.exec(stmt).await?))
    }

    fn check_fields(&self, record: &Record) -> Result<()> {
        match record.keys().find(|key| self.model.field(key).is_none()) {
            Some(key) => Err(Error::invalid_schema(format!(
                "unknown field `{key}` in schema `{}`",
                self.model.reference
            ))),
            None => Ok(()),
        }
    }

    fn filter(&self, conditions: &Record) -> Result<Filter> {
        self.check_fields(conditions)?;

        let mut filter = Filter::all();

        for (reference, value) in conditions {
            let Some(field) = self.model.field(reference) else {
                continue;
            };

            let column = self.column_ref(&field.column);
            filter = match self.encode(field, value) {
                Value::Null => filter.is_null(column),
                value => filter.eq(column, value),
            };
        }

        if let Some(deleted) = &self.model.audit.deleted {
            filter = filter.is_null(self.column_ref(deleted));
        }

        Ok(filter)
    }

    fn encode(&self, field: &FieldMapping, value: &Json) -> Value {
        match self.model.hook(&field.column) {
            Some(hook) => hook.serialize(value),
            None => Value::from_json(value, &self.column_ref(&field.column).ty),
        }
    }

    fn decode(&self, row: ValueRecord) -> Result<Record> {
        let mut record = Record::new();

        for (field, value) in self.model.fields.iter().zip(row) {
            record.insert(field.reference.clone(), self.decode_value(field, value)?);
        }

        Ok(record)
    }

    fn decode_value(&self, field: &FieldMapping, value: Value) -> Result<Json> {
        match self.model.hook(&field.column) {
            Some(hook) => hook.deserialize(value),
            None => Ok(value.to_json()),
        }
    }

    fn column_ref(&self, column: &str) -> ColumnRef {
        let ty = self
            .model
            .column(column)
            .map(|column| column.storage_ty.clone())
            .unwrap_or(strata_core::schema::db::Type::Text);

        ColumnRef {
            name: column.to_string(),
            ty,
        }
    }

    fn field_of(&self, column: &str) -> Option<&FieldMapping> {
        self.model.fields.iter().find(|field| field.column == column)
    }

    fn reference_of(&self, column: &str) -> Option<&String> {
        self.field_of(column).map(|field| &field.reference)
    }

    fn primary_fields(&self) -> Vec<&FieldMapping> {
        self.model
            .table
            .primary_key_columns()
            .filter_map(|column| self.field_of(&column.name))
            .collect()
    }
}

fn affected(response: Response) -> u64 {
    match response.rows {
        Rows::Count(count) => count,
        Rows::Values(rows) => rows.len() as u64,
    }
}

fn fill(record: &mut Record, reference: Option<&String>, value: Json) {
    let Some(reference) = reference else {
        return;
    };

    match record.get(reference) {
        Some(existing) if !existing.is_null() => {}
        _ => {
            record.insert(reference.clone(), value);
        }
    }
}

/// Current UTC time in the `YYYY-MM-DD HH:MM:SS` form every dialect accepts
/// for its timestamp columns.
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
