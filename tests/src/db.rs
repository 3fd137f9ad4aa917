//! Engine setups. MySQL and PostgreSQL read their URL from
//! `STRATA_MYSQL_URL` / `STRATA_POSTGRESQL_URL` and share one database, so
//! run them with `--test-threads=1`.

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "postgresql")]
pub mod postgresql;

#[cfg(feature = "sqlite")]
pub mod sqlite;
