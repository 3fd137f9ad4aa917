pub mod db;

use strata::{DatabaseDef, Dialect, Link, Record};

/// A database engine the end-to-end tests can run against.
#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    fn dialect(&self) -> Dialect;

    fn dsn(&self) -> String;

    /// Drops every table left behind by a previous test. In-memory SQLite
    /// starts empty on each connection and has nothing to do.
    async fn reset(&self) -> strata::Result<()>;

    fn database(&self, name: &str) -> DatabaseDef {
        DatabaseDef::new(name, self.dsn(), self.dialect())
    }

    /// Connects a link on a freshly reset database.
    async fn link(&self, name: &str) -> Link {
        self.reset().await.unwrap();
        Link::connect(self.database(name)).await.unwrap()
    }
}

/// Installs a `tracing` subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a record from a JSON object literal.
pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(record) => record,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Runs each listed `async fn(&dyn Setup)` once per enabled engine.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    $crate::init_logging();
                    let setup = $crate::db::sqlite::SetupSqlite::new();
                    super::$f(&setup).await;
                }
            )*
        }

        #[cfg(feature = "mysql")]
        mod mysql {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    $crate::init_logging();
                    let setup = $crate::db::mysql::SetupMySQL::new();
                    super::$f(&setup).await;
                }
            )*
        }

        #[cfg(feature = "postgresql")]
        mod postgresql {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    $crate::init_logging();
                    let setup = $crate::db::postgresql::SetupPostgreSQL::new();
                    super::$f(&setup).await;
                }
            )*
        }
    };
}
