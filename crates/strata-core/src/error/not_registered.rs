use super::Error;

/// Error when a lookup misses a database or a schema reference.
#[derive(Debug)]
pub(super) struct NotRegistered {
    database: Box<str>,
    reference: Option<Box<str>>,
}

impl std::error::Error for NotRegistered {}

impl core::fmt::Display for NotRegistered {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.reference {
            Some(reference) => write!(
                f,
                "not registered: schema `{}` in database `{}`",
                reference, self.database
            ),
            None => write!(f, "not registered: database `{}`", self.database),
        }
    }
}

impl Error {
    /// Creates a lookup-miss error. When `reference` is `None` the database
    /// itself is unknown.
    pub fn not_registered(database: impl Into<String>, reference: Option<&str>) -> Error {
        Error::from(super::ErrorKind::NotRegistered(NotRegistered {
            database: database.into().into(),
            reference: reference.map(Into::into),
        }))
    }

    pub fn is_not_registered(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::NotRegistered(_)))
    }
}
