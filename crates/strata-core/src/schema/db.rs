mod column;
pub use column::{Column, ColumnDefault, ColumnsDiff, ColumnsDiffItem};

mod diff;
pub use diff::{RenameHints, TableDiff};

mod index;
pub use index::{Index, IndicesDiff, IndicesDiffItem};

mod migration;
pub use migration::Migration;

mod table;
pub use table::Table;

mod ty;
pub use ty::Type;
