use super::Error;

/// Error when a connection string's scheme does not name a supported engine.
#[derive(Debug)]
pub(super) struct UnsupportedDatabaseType {
    dsn: Box<str>,
}

impl std::error::Error for UnsupportedDatabaseType {}

impl core::fmt::Display for UnsupportedDatabaseType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported database type; dsn={}", self.dsn)
    }
}

impl Error {
    pub fn unsupported_database_type(dsn: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedDatabaseType(
            UnsupportedDatabaseType {
                dsn: dsn.into().into(),
            },
        ))
    }

    pub fn is_unsupported_database_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::UnsupportedDatabaseType(_)))
    }
}
