/// Describes what a dialect can do natively.
///
/// The model compiler and the migration generator consult these flags
/// instead of matching on the dialect directly.
#[derive(Debug)]
pub struct Capability {
    /// Stores JSON in a native column type. Without it, JSON columns are
    /// emulated as text with serialize/deserialize hooks.
    pub native_json: bool,

    /// Supports `ALTER TABLE ... ALTER COLUMN` (or an equivalent). When
    /// false, column alterations rebuild the table.
    pub alter_column: bool,

    /// Changes several column properties in a single statement
    /// (`MODIFY COLUMN`). When false, each property is altered separately.
    pub alter_column_properties_atomic: bool,

    /// Supports `CREATE INDEX IF NOT EXISTS`. When false, indices are
    /// declared inline in `CREATE TABLE`.
    pub create_index_if_not_exists: bool,

    /// Supports `INSERT ... RETURNING`.
    pub returning: bool,

    /// SQL expression generating a random UUID, used as the default of a
    /// sole UUID primary key.
    pub uuid_default: &'static str,

    /// Default length of `CHAR`/`VARCHAR` columns declared without one.
    pub default_string_length: u64,
}

impl Capability {
    pub const SQLITE: Self = Self {
        native_json: false,
        alter_column: false,
        alter_column_properties_atomic: false,
        create_index_if_not_exists: true,
        returning: true,
        uuid_default: "(lower(hex(randomblob(4))) || '-' || lower(hex(randomblob(2))) || '-4' || \
            substr(lower(hex(randomblob(2))), 2) || '-' || \
            substr('89ab', abs(random()) % 4 + 1, 1) || \
            substr(lower(hex(randomblob(2))), 2) || '-' || lower(hex(randomblob(6))))",
        default_string_length: 255,
    };

    pub const POSTGRESQL: Self = Self {
        native_json: true,
        alter_column: true,
        alter_column_properties_atomic: false,
        create_index_if_not_exists: true,
        returning: true,
        uuid_default: "gen_random_uuid()",
        default_string_length: 255,
    };

    pub const MYSQL: Self = Self {
        native_json: true,
        alter_column: true,
        alter_column_properties_atomic: true,
        create_index_if_not_exists: false,
        returning: false,
        uuid_default: "(UUID())",
        default_string_length: 255,
    };

    /// Returns `true` if `expr`, as reported by an engine catalog, generates
    /// a random UUID.
    pub fn is_uuid_default(&self, expr: &str) -> bool {
        let expr = expr.to_ascii_lowercase();
        expr.contains("gen_random_uuid")
            || expr.contains("uuid_generate_v4")
            || expr.contains("uuid()")
            || expr.contains("randomblob(16)")
            || (expr.contains("randomblob") && expr.contains("'-4'"))
    }
}
