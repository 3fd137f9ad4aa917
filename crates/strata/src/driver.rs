use crate::Result;

use strata_core::{
    schema::{app::DatabaseDef, Dialect},
    Driver,
};

/// Builds the driver for a database definition. No connection is opened.
pub(crate) fn driver_for(def: &DatabaseDef) -> Result<Box<dyn Driver>> {
    match def.ty {
        Dialect::Mysql => mysql(&def.dsn),
        Dialect::Postgres => postgresql(&def.dsn),
        Dialect::Sqlite => sqlite(&def.dsn),
    }
}

#[cfg(feature = "mysql")]
fn mysql(dsn: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(strata_driver_mysql::MySQL::new(dsn)?))
}

#[cfg(not(feature = "mysql"))]
fn mysql(_dsn: &str) -> Result<Box<dyn Driver>> {
    strata_core::bail!("`mysql` feature not enabled")
}

#[cfg(feature = "postgresql")]
fn postgresql(dsn: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(strata_driver_postgresql::PostgreSQL::new(dsn)?))
}

#[cfg(not(feature = "postgresql"))]
fn postgresql(_dsn: &str) -> Result<Box<dyn Driver>> {
    strata_core::bail!("`postgresql` feature not enabled")
}

#[cfg(feature = "sqlite")]
fn sqlite(dsn: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(strata_driver_sqlite::Sqlite::new(dsn)?))
}

#[cfg(not(feature = "sqlite"))]
fn sqlite(_dsn: &str) -> Result<Box<dyn Driver>> {
    strata_core::bail!("`sqlite` feature not enabled")
}
