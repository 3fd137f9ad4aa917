use super::Error;

/// Error when an abstract field type has no engine mapping.
///
/// Compilation of the affected schema is aborted; other schemas in the same
/// batch are unaffected.
#[derive(Debug)]
pub(super) struct UnsupportedType {
    ty: Box<str>,
    location: Option<Box<str>>,
}

impl std::error::Error for UnsupportedType {}

impl core::fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported type `{}`", self.ty)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

impl Error {
    pub fn unsupported_type(ty: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            ty: ty.into().into(),
            location: None,
        }))
    }

    /// Creates an unsupported type error naming the schema and field.
    pub fn unsupported_type_at(ty: impl Into<String>, schema: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::UnsupportedType(UnsupportedType {
            ty: ty.into().into(),
            location: Some(format!("schema={schema}; field={field}").into()),
        }))
    }

    pub fn is_unsupported_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedType(_)))
    }
}
