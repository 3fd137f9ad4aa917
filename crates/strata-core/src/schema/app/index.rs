use serde::{Deserialize, Serialize};

/// A named or unnamed list of field references, used for both index and
/// unique declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDef {
    /// Explicit constraint name. Unnamed declarations receive a name derived
    /// from the table and column names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub fields: Vec<String>,
}

impl IndexDef {
    pub fn new<I, S>(fields: I) -> IndexDef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexDef {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> IndexDef {
        self.name = Some(name.into());
        self
    }
}
