//! Conversion of engine catalog entries into imported schemas.

use strata_core::{
    driver::{Capability, CatalogColumn, CatalogTable},
    schema::{
        app::{Field, FieldTag, FieldType, SchemaDef, TypeParams, TAG_IMPORTED},
        mapping,
    },
};

/// Tables created by the platform itself while rebuilding other tables.
pub(super) fn is_internal(table: &str) -> bool {
    table.starts_with("_strata_")
}

pub(super) fn import_table(database: &str, table: &CatalogTable, capability: &Capability) -> SchemaDef {
    let mut schema = SchemaDef::new(database, &table.name).tag(TAG_IMPORTED);

    for column in &table.columns {
        let mut field = import_column(&table.name, column);

        let primary = if table.primary_key.is_empty() {
            field.ty == FieldType::Uuid
                && column
                    .default
                    .as_deref()
                    .is_some_and(|expr| capability.is_uuid_default(expr))
        } else {
            table.primary_key.contains(&column.name)
        };

        if primary {
            field = field.tag(FieldTag::Primary);
        } else if column.nullable {
            field = field.tag(FieldTag::Nullable);
        }

        schema = schema.field(field);
    }

    schema
}

fn import_column(table: &str, column: &CatalogColumn) -> Field {
    let (ty, params) = match mapping::from_engine_type(&column.raw_type, &column.enum_values) {
        Some(mapped) => mapped,
        None => {
            tracing::warn!(
                table = %table,
                column = %column.name,
                raw_type = %column.raw_type,
                "unmappable column type imported as TEXT"
            );
            (FieldType::Text, TypeParams::default())
        }
    };

    Field::new(&column.name, ty).params(params)
}
