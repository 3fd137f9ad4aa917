use crate::Setup;

use mysql_async::prelude::Queryable;
use strata::{Dialect, Error};

#[derive(Debug)]
pub struct SetupMySQL {
    url: String,
}

impl SetupMySQL {
    pub fn new() -> Self {
        let url = std::env::var("STRATA_MYSQL_URL")
            .unwrap_or_else(|_| "mysql://root@localhost:3306/strata_test".to_string());
        Self { url }
    }
}

#[async_trait::async_trait]
impl Setup for SetupMySQL {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn dsn(&self) -> String {
        self.url.clone()
    }

    async fn reset(&self) -> strata::Result<()> {
        let pool = mysql_async::Pool::new(self.url.as_str());
        let mut conn = pool.get_conn().await.map_err(Error::driver_operation_failed)?;

        let tables: Vec<String> = conn
            .query(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = DATABASE()",
            )
            .await
            .map_err(Error::driver_operation_failed)?;

        conn.query_drop("SET FOREIGN_KEY_CHECKS = 0")
            .await
            .map_err(Error::driver_operation_failed)?;

        for table in tables {
            conn.query_drop(format!("DROP TABLE IF EXISTS `{}`", table.replace('`', "``")))
                .await
                .map_err(Error::driver_operation_failed)?;
        }

        conn.query_drop("SET FOREIGN_KEY_CHECKS = 1")
            .await
            .map_err(Error::driver_operation_failed)?;

        drop(conn);
        pool.disconnect().await.map_err(Error::driver_operation_failed)
    }
}
