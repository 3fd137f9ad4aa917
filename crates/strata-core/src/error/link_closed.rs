use super::Error;

/// Error when an operation is sent to a link whose connection was closed.
#[derive(Debug)]
pub(super) struct LinkClosed {
    database: Box<str>,
}

impl std::error::Error for LinkClosed {}

impl core::fmt::Display for LinkClosed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "link for database `{}` is closed", self.database)
    }
}

impl Error {
    pub fn link_closed(database: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::LinkClosed(LinkClosed {
            database: database.into().into(),
        }))
    }

    pub fn is_link_closed(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::LinkClosed(_)))
    }
}
