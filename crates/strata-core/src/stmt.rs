//! Row-level statements issued by model handles.
//!
//! Statements name tables and columns physically and carry the storage type
//! of every column they touch so each driver can bind and decode values its
//! own way.

mod filter;
pub use filter::{Condition, Filter};

mod statement;
pub use statement::{ColumnRef, Delete, Insert, Query, Statement, Update};

mod value;
pub use value::{Value, ValueRecord};
