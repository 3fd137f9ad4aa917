/// A table as reported by an engine catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    pub name: String,

    pub columns: Vec<CatalogColumn>,

    /// Column names of the primary key, in key order. Empty when the table
    /// declares none.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub name: String,

    /// Type as reported by the engine, upper-cased and trimmed.
    pub raw_type: String,

    pub nullable: bool,

    /// Default expression, verbatim.
    pub default: Option<String>,

    /// Members of an enumerated type, when the engine reports them.
    pub enum_values: Vec<String>,

    pub auto_increment: bool,
}

impl CatalogColumn {
    pub fn new(name: impl Into<String>, raw_type: &str) -> CatalogColumn {
        CatalogColumn {
            name: name.into(),
            raw_type: normalize_type(raw_type),
            nullable: true,
            default: None,
            enum_values: vec![],
            auto_increment: false,
        }
    }
}

/// Upper-cases a raw type string and collapses whitespace so it can be
/// matched against the reverse mapping table.
pub(crate) fn normalize_type(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
        .replace(", ", ",")
}
