use serde::{Deserialize, Serialize};

/// Named edge between two schemas.
///
/// Relations are declarative. They are stored and round-tripped with the
/// schema but produce no storage of their own; join resolution belongs to
/// whatever consumes the compiled models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub reference: String,

    pub kind: RelationKind,

    /// Reference of the target schema.
    pub target: String,

    pub local_field: String,

    pub remote_field: String,

    /// Join-table schema reference, only meaningful for `manyToMany`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsToOne,
    BelongsToMany,
    ManyToMany,
}
