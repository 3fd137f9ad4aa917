use crate::Setup;

use strata::Dialect;

#[derive(Debug, Default)]
pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn dsn(&self) -> String {
        "sqlite::memory:".to_string()
    }

    async fn reset(&self) -> strata::Result<()> {
        Ok(())
    }
}
