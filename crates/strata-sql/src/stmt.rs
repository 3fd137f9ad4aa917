mod add_column;
pub use add_column::AddColumn;

mod alter_column;
pub use alter_column::{AlterColumn, AlterColumnChanges};

mod alter_table;
pub use alter_table::{AlterTable, AlterTableAction};

mod column_def;
pub use column_def::ColumnDef;

mod copy_table;
pub use copy_table::CopyTable;

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod drop_column;
pub use drop_column::DropColumn;

mod drop_index;
pub use drop_index::DropIndex;

mod drop_table;
pub use drop_table::DropTable;

mod name;
pub use name::Name;

mod pragma;
pub use pragma::Pragma;

pub use strata_core::stmt::*;

#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    AlterColumn(AlterColumn),
    AlterTable(AlterTable),
    CopyTable(CopyTable),
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    DropColumn(DropColumn),
    DropIndex(DropIndex),
    DropTable(DropTable),
    Pragma(Pragma),
    Delete(Delete),
    Insert(Insert),
    Query(Query),
    Update(Update),
}

impl Statement {
    /// Returns `true` if the statement may destroy data.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Statement::DropColumn(_) | Statement::DropTable(_))
    }
}

impl From<strata_core::stmt::Statement> for Statement {
    fn from(value: strata_core::stmt::Statement) -> Self {
        match value {
            strata_core::stmt::Statement::Delete(stmt) => Statement::Delete(stmt),
            strata_core::stmt::Statement::Insert(stmt) => Statement::Insert(stmt),
            strata_core::stmt::Statement::Query(stmt) => Statement::Query(stmt),
            strata_core::stmt::Statement::Update(stmt) => Statement::Update(stmt),
        }
    }
}
