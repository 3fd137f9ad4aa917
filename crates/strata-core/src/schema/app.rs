//! Engine-neutral schema definitions.
//!
//! These types are what operators declare, what seed documents contain and
//! what the bootstrap database persists. They never reference a specific
//! engine; see [`crate::schema::compile`] for the engine projection.

mod database;
pub use database::DatabaseDef;

mod field;
pub use field::{Field, FieldTag, TypeParams};

mod field_type;
pub use field_type::FieldType;

mod index;
pub use index::IndexDef;

mod relation;
pub use relation::{Relation, RelationKind};

mod schema;
pub use schema::{SchemaDef, SchemaKey, TAG_IMPORTED, TAG_READONLY, TAG_SYSTEM};
