use crate::{
    config::StrataConfig,
    database::{self, DatabaseService},
    link_service::LinkService,
    reconcile::Reconciler,
    registry::{Origin, SchemaRegistry},
    Result,
};

use futures::future::join_all;
use std::sync::Arc;
use strata_core::schema::app::{DatabaseDef, SchemaDef};
use tracing::{error, info};

/// Definitions of the bootstrap tables, embedded so a fresh system database
/// can always be initialized.
const SYSTEM_SEEDS: [&str; 2] = [
    include_str!("../seeds/schema.json"),
    include_str!("../seeds/database.json"),
];

/// A running platform instance.
#[derive(Debug)]
pub struct Strata {
    pub config: StrataConfig,
    pub registry: Arc<SchemaRegistry>,
    pub links: Arc<LinkService>,
    pub databases: Arc<DatabaseService>,
    pub reconciler: Reconciler,
}

/// Brings the platform up.
///
/// 1. Connects the bootstrap database named by `config.system_dsn`.
/// 2. Registers the embedded system schemas and the seed directory.
/// 3. Creates the bootstrap tables.
/// 4. Loads the persisted schemas and database definitions.
/// 5. Connects every other database concurrently.
///
/// Failing to reach the bootstrap database is fatal. Any other database that
/// fails to connect is logged and left out.
pub async fn bootstrap(config: StrataConfig) -> Result<Strata> {
    let system = DatabaseDef::new(
        DatabaseDef::SYSTEM,
        &config.system_dsn,
        database::type_from_dsn(&config.system_dsn)?,
    );

    let links = Arc::new(LinkService::new());
    let registry = Arc::new(SchemaRegistry::new(links.clone()));

    for src in SYSTEM_SEEDS {
        let schema = SchemaDef::from_json(serde_json::from_str(src)?)?;
        registry.register(schema, Origin::Disk).await;
    }

    if let Some(dir) = &config.seed_dir {
        registry.seed_from_dir(dir).await?;
    }

    let system_schemas = registry.find_by_database(DatabaseDef::SYSTEM).await;
    let system_link = links.create(system.clone(), system_schemas).await?;

    registry.load_persisted().await?;

    // Persisted definitions may replace seeds of the bootstrap database.
    system_link
        .set_schemas(registry.find_by_database(DatabaseDef::SYSTEM).await)
        .await?;

    let databases = Arc::new(DatabaseService::new(links.clone(), system));

    let defs: Vec<DatabaseDef> = databases
        .find_all()
        .await?
        .into_iter()
        .filter(|def| !def.is_system())
        .collect();

    let results = join_all(defs.into_iter().map(|def| {
        let links = links.clone();
        let registry = registry.clone();
        async move {
            let name = def.name.clone();
            let schemas = registry.find_by_database(&name).await;
            (name, links.create(def, schemas).await)
        }
    }))
    .await;

    for (name, result) in results {
        match result {
            Ok(_) => info!(database = %name, "database connected"),
            Err(err) => error!(database = %name, error = %err, "failed to connect database"),
        }
    }

    let reconciler = Reconciler::spawn(
        registry.clone(),
        links.clone(),
        config.event_queue_capacity,
    );

    Ok(Strata {
        config,
        registry,
        links,
        databases,
        reconciler,
    })
}

impl Strata {
    /// Stops the reconciler after draining queued events, then closes every
    /// link.
    pub async fn shutdown(self) -> Result<()> {
        self.reconciler.shutdown().await;

        for link in self.links.find_all().await {
            self.links.remove(link.name()).await?;
        }

        Ok(())
    }
}
