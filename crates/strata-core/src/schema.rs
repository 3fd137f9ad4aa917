pub mod app;

pub mod compile;
pub use compile::{compile, AuditColumns, ColumnHook, CompiledModel, FieldMapping};

pub mod db;

mod dialect;
pub use dialect::Dialect;

pub mod mapping;
