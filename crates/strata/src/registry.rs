use crate::{link_service::LinkService, model::ModelHandle, Record, Result};

use indexmap::IndexMap;
use serde_json::Value as Json;
use std::{path::Path, sync::Arc};
use strata_core::{
    schema::app::{DatabaseDef, SchemaDef, SchemaKey},
    Error,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Reference of the bootstrap schema persisting schema definitions.
pub const SCHEMA_MODEL: &str = "Schema";

/// Reference of the bootstrap schema persisting database definitions.
pub const DATABASE_MODEL: &str = "Database";

/// Where a registered definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A seed document read at startup.
    Disk,

    /// The bootstrap database, or a live reconciliation event.
    Database,
}

/// The authoritative set of schema definitions, keyed by
/// `(database, reference)`.
#[derive(Debug)]
pub struct SchemaRegistry {
    entries: RwLock<IndexMap<SchemaKey, Entry>>,
    links: Arc<LinkService>,
}

#[derive(Debug, Clone)]
struct Entry {
    schema: SchemaDef,
    origin: Origin,
}

impl SchemaRegistry {
    pub fn new(links: Arc<LinkService>) -> SchemaRegistry {
        SchemaRegistry {
            entries: RwLock::new(IndexMap::new()),
            links,
        }
    }

    /// Stores `schema`, replacing any entry with the same key.
    ///
    /// A [`Origin::Disk`] definition never replaces one that came from the
    /// database; `false` is returned in that case.
    pub async fn register(&self, schema: SchemaDef, origin: Origin) -> bool {
        let key = schema.key();
        let mut entries = self.entries.write().await;

        if origin == Origin::Disk
            && entries
                .get(&key)
                .is_some_and(|entry| entry.origin == Origin::Database)
        {
            debug!(schema = %key, "keeping persisted definition over seed");
            return false;
        }

        debug!(schema = %key, ?origin, "registering schema");
        entries.insert(key, Entry { schema, origin });
        true
    }

    pub async fn find_one(&self, database: &str, reference: &str) -> Option<SchemaDef> {
        self.entries
            .read()
            .await
            .get(&SchemaKey::new(database, reference))
            .map(|entry| entry.schema.clone())
    }

    pub async fn origin(&self, database: &str, reference: &str) -> Option<Origin> {
        self.entries
            .read()
            .await
            .get(&SchemaKey::new(database, reference))
            .map(|entry| entry.origin)
    }

    pub async fn find_by_database(&self, database: &str) -> Vec<SchemaDef> {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.schema.database == database)
            .map(|entry| entry.schema.clone())
            .collect()
    }

    /// Every registered schema. When the bootstrap `Schema` table is live,
    /// persisted definitions are reloaded first.
    pub async fn find_all(&self) -> Result<Vec<SchemaDef>> {
        if self.schema_table_live().await {
            self.load_persisted().await?;
        }

        Ok(self
            .entries
            .read()
            .await
            .values()
            .map(|entry| entry.schema.clone())
            .collect())
    }

    /// Resolves the model handle for a registered schema on its live link.
    pub async fn get_model(&self, database: &str, reference: &str) -> Result<ModelHandle> {
        if self.find_one(database, reference).await.is_none() {
            return Err(Error::not_registered(database, Some(reference)));
        }

        let link = self
            .links
            .find_by_name(database)
            .await
            .ok_or_else(|| Error::not_registered(database, None))?;

        link.model(reference)
    }

    pub async fn remove(&self, database: &str, reference: &str) -> Option<SchemaDef> {
        self.entries
            .write()
            .await
            .shift_remove(&SchemaKey::new(database, reference))
            .map(|entry| entry.schema)
    }

    /// Registers every schema document found in `dir` with
    /// [`Origin::Disk`].
    ///
    /// Each `*.json` file holds one schema object or an array of them. Files
    /// are read in name order. A document that does not parse is logged and
    /// skipped. Returns the number of registered schemas.
    pub async fn seed_from_dir(&self, dir: &Path) -> Result<usize> {
        let mut paths = vec![];
        let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|err| {
            Error::from(err).context(strata_core::err!(
                "reading seed directory `{}`",
                dir.display()
            ))
        })?;

        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registered = 0;

        for path in paths {
            let src = tokio::fs::read_to_string(&path).await?;

            let documents = match serde_json::from_str(&src) {
                Ok(Json::Array(documents)) => documents,
                Ok(document) => vec![document],
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping malformed seed file");
                    continue;
                }
            };

            for document in documents {
                match SchemaDef::from_json(document) {
                    Ok(schema) => {
                        if self.register(schema, Origin::Disk).await {
                            registered += 1;
                        }
                    }
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "skipping seed schema");
                    }
                }
            }
        }

        info!(dir = %dir.display(), registered, "seed schemas loaded");
        Ok(registered)
    }

    /// Registers every definition stored in the bootstrap `Schema` table with
    /// [`Origin::Database`]. Rows that do not parse are logged and skipped.
    pub async fn load_persisted(&self) -> Result<usize> {
        let rows = self.schema_model().await?.all().await?;
        let mut loaded = 0;

        for row in rows {
            match schema_from_row(row) {
                Ok(schema) => {
                    self.register(schema, Origin::Database).await;
                    loaded += 1;
                }
                Err(err) => warn!(error = %err, "skipping persisted schema"),
            }
        }

        debug!(loaded, "persisted schemas loaded");
        Ok(loaded)
    }

    /// Writes `schema` to the bootstrap `Schema` table and registers it with
    /// [`Origin::Database`]. A stored row for the same key is updated in
    /// place, so a failed write leaves the previous definition intact.
    pub async fn persist(&self, schema: SchemaDef) -> Result<()> {
        let model = self.schema_model().await?;

        let mut key = Record::new();
        key.insert("reference".to_string(), Json::from(schema.reference.clone()));
        key.insert("database".to_string(), Json::from(schema.database.clone()));

        let mut row = row_from_schema(&schema)?;

        if model.find(key.clone()).await?.is_empty() {
            model.create(row).await?;
        } else {
            // Clear the columns the new definition leaves out.
            for field in &model.model().fields {
                if !BOOKKEEPING.contains(&field.reference.as_str()) {
                    row.entry(field.reference.clone()).or_insert(Json::Null);
                }
            }
            model.update(key, row).await?;
        }

        self.register(schema, Origin::Database).await;
        Ok(())
    }

    async fn schema_model(&self) -> Result<ModelHandle> {
        let link = self
            .links
            .find_by_name(DatabaseDef::SYSTEM)
            .await
            .ok_or_else(|| Error::not_registered(DatabaseDef::SYSTEM, None))?;

        link.model(SCHEMA_MODEL)
    }

    async fn schema_table_live(&self) -> bool {
        match self.links.find_by_name(DatabaseDef::SYSTEM).await {
            Some(link) => link.is_tracked(SCHEMA_MODEL),
            None => false,
        }
    }
}

/// Columns of the `Schema` table that are bookkeeping, not definition.
const BOOKKEEPING: [&str; 3] = ["id", "createdAt", "updatedAt"];

fn schema_from_row(mut row: Record) -> Result<SchemaDef> {
    for column in BOOKKEEPING {
        row.remove(column);
    }
    row.retain(|_, value| !value.is_null());

    SchemaDef::from_json(Json::Object(row))
}

fn row_from_schema(schema: &SchemaDef) -> Result<Record> {
    match serde_json::to_value(schema)? {
        Json::Object(row) => Ok(row),
        other => Err(strata_core::err!(
            "schema `{}` serialized to {other} instead of an object",
            schema.key()
        )),
    }
}
