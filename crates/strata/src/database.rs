use crate::{link_service::LinkService, model::ModelHandle, registry::DATABASE_MODEL, Record, Result};

use serde_json::Value as Json;
use std::sync::Arc;
use strata_core::{
    schema::{app::DatabaseDef, Dialect},
    Error,
};
use url::Url;

/// Resolves the dialect of a connection string from its scheme.
///
/// `postgres://` and `postgresql://` select Postgres, `mysql://` and
/// `mariadb://` select MySQL, and `sqlite::memory:` or a `sqlite:` file URL
/// selects SQLite.
pub fn type_from_dsn(dsn: &str) -> Result<Dialect> {
    let url = Url::parse(dsn).map_err(|_| Error::unsupported_database_type(dsn))?;

    match url.scheme() {
        "postgres" | "postgresql" => Ok(Dialect::Postgres),
        "mysql" | "mariadb" => Ok(Dialect::Mysql),
        "sqlite" => Ok(Dialect::Sqlite),
        _ => Err(Error::unsupported_database_type(dsn)),
    }
}

/// Database definitions stored in the bootstrap `Database` table.
///
/// The bootstrap database itself is not stored; it is always reported first.
#[derive(Debug)]
pub struct DatabaseService {
    links: Arc<LinkService>,
    system: DatabaseDef,
}

impl DatabaseService {
    pub fn new(links: Arc<LinkService>, system: DatabaseDef) -> DatabaseService {
        DatabaseService { links, system }
    }

    pub fn system(&self) -> &DatabaseDef {
        &self.system
    }

    /// Stores a new database definition. The dialect is derived from the
    /// DSN, overriding whatever `def` carried.
    pub async fn create(&self, mut def: DatabaseDef) -> Result<DatabaseDef> {
        def.ty = type_from_dsn(&def.dsn)?;

        if def.is_system() {
            return Err(Error::invalid_schema(format!(
                "database name `{}` is reserved",
                def.name
            )));
        }

        let model = self.model().await?;

        if !model.find(by_name(&def.name)).await?.is_empty() {
            return Err(Error::invalid_schema(format!(
                "database `{}` already exists",
                def.name
            )));
        }

        let row = match serde_json::to_value(&def)? {
            Json::Object(row) => row,
            other => strata_core::bail!("database definition serialized to {other}"),
        };
        model.create(row).await?;

        tracing::info!(database = %def.name, dialect = %def.ty, "database definition stored");
        Ok(def)
    }

    pub async fn find_all(&self) -> Result<Vec<DatabaseDef>> {
        let rows = self.model().await?.all().await?;

        let mut defs = vec![self.system.clone()];
        for row in rows {
            defs.push(database_from_row(row)?);
        }
        Ok(defs)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<DatabaseDef>> {
        if name == self.system.name {
            return Ok(Some(self.system.clone()));
        }

        let rows = self.model().await?.find(by_name(name)).await?;
        rows.into_iter().next().map(database_from_row).transpose()
    }

    /// Removes a stored definition. Returns `false` when none matched. The
    /// bootstrap database cannot be deleted.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        if name == self.system.name {
            return Err(Error::invalid_schema(format!(
                "database `{name}` cannot be deleted"
            )));
        }

        let deleted = self.model().await?.delete(by_name(name)).await?;
        Ok(deleted > 0)
    }

    async fn model(&self) -> Result<ModelHandle> {
        let link = self
            .links
            .find_by_name(&self.system.name)
            .await
            .ok_or_else(|| Error::not_registered(&self.system.name, None))?;

        link.model(DATABASE_MODEL)
    }
}

fn by_name(name: &str) -> Record {
    let mut conditions = Record::new();
    conditions.insert("name".to_string(), Json::from(name));
    conditions
}

fn database_from_row(row: Record) -> Result<DatabaseDef> {
    Ok(serde_json::from_value(Json::Object(row))?)
}
