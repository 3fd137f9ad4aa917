use crate::{link::Link, Result};

use indexmap::IndexMap;
use strata_core::schema::app::{DatabaseDef, SchemaDef};
use tokio::sync::RwLock;

/// Live links, keyed by database name.
#[derive(Debug, Default)]
pub struct LinkService {
    links: RwLock<IndexMap<String, Link>>,
}

impl LinkService {
    pub fn new() -> LinkService {
        LinkService::default()
    }

    /// Connects `database`, synchronizes `schemas` and registers the link.
    ///
    /// The link is registered only once the connection is established. A
    /// link already registered under the same name is closed and replaced.
    pub async fn create(&self, database: DatabaseDef, schemas: Vec<SchemaDef>) -> Result<Link> {
        let link = Link::connect(database).await?;

        if !schemas.is_empty() {
            if let Err(err) = link.set_schemas(schemas).await {
                let _ = link.close().await;
                return Err(err);
            }
        }

        let previous = self
            .links
            .write()
            .await
            .insert(link.name().to_string(), link.clone());

        if let Some(previous) = previous {
            if let Err(err) = previous.close().await {
                tracing::debug!(database = %previous.name(), error = %err, "replaced link was already closed");
            }
        }

        Ok(link)
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Link> {
        self.links.read().await.get(name).cloned()
    }

    pub async fn find_all(&self) -> Vec<Link> {
        self.links.read().await.values().cloned().collect()
    }

    /// Imports the untracked tables of `link`. See [`Link::discover`].
    pub async fn discover(&self, link: &Link) -> Result<Vec<SchemaDef>> {
        link.discover().await
    }

    /// Unregisters and closes the link for `name`. Returns `false` when no
    /// link was registered under that name.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let removed = self.links.write().await.shift_remove(name);

        match removed {
            Some(link) => {
                link.close().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
