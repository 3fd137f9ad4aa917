mod capability;
pub use capability::Capability;

mod catalog;
pub use catalog::{CatalogColumn, CatalogTable};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

use crate::{
    async_trait,
    schema::{
        db::{Migration, TableDiff},
        Dialect,
    },
    Result,
};

use std::fmt::Debug;

/// A native engine family.
///
/// A driver knows how to open connections from its URL and how to spell
/// schema changes for its dialect.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    fn dialect(&self) -> Dialect;

    /// Describes the driver's capability, which informs the model compiler
    /// and the migration generator.
    fn capability(&self) -> &'static Capability {
        self.dialect().capability()
    }

    /// Opens a new connection. Connectivity is validated before returning.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Generates the statements applying a single table diff.
    fn generate_migration(&self, diff: &TableDiff<'_>) -> Migration;
}

/// A live connection owned by exactly one link.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;

    /// Reads the engine catalog: every user table with its columns, raw type
    /// strings and default expressions. Engine-internal tables are omitted.
    async fn introspect(&mut self) -> Result<Vec<CatalogTable>>;

    /// Releases the native connection.
    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
