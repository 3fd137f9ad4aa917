use crate::Setup;

use strata::{Dialect, Error};

#[derive(Debug)]
pub struct SetupPostgreSQL {
    url: String,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        let url = std::env::var("STRATA_POSTGRESQL_URL")
            .unwrap_or_else(|_| "postgresql://localhost:5432/strata_test".to_string());
        Self { url }
    }
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn dsn(&self) -> String {
        self.url.clone()
    }

    async fn reset(&self) -> strata::Result<()> {
        let (client, connection) = tokio_postgres::connect(&self.url, tokio_postgres::NoTls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            let _ = connection.await;
        });

        client
            .batch_execute("DROP SCHEMA IF EXISTS public CASCADE; CREATE SCHEMA public;")
            .await
            .map_err(Error::driver_operation_failed)
    }
}
