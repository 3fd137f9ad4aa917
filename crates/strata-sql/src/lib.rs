pub mod migration;
pub use migration::{generate_migration, MigrationStatement};

pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;
