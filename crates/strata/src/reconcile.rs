//! Reaction to schema and database changes.
//!
//! Events are queued on a bounded channel and dispatched to one worker task
//! per database, so the changes of one database are applied in the order
//! they were sent while different databases proceed independently.

use crate::{
    link_service::LinkService,
    registry::{Origin, SchemaRegistry},
    Result,
};

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};
use strata_core::schema::app::{DatabaseDef, SchemaDef};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub enum Event {
    SchemaCreated(SchemaDef),
    SchemaUpdated(SchemaDef),
    DatabaseCreated(DatabaseDef),
    /// Carries the database name.
    DatabaseDeleted(String),
}

impl Event {
    /// Name of the database the event applies to.
    pub fn database(&self) -> &str {
        match self {
            Event::SchemaCreated(schema) | Event::SchemaUpdated(schema) => &schema.database,
            Event::DatabaseCreated(def) => &def.name,
            Event::DatabaseDeleted(name) => name,
        }
    }
}

/// Handle to the reconciliation dispatcher.
#[derive(Debug)]
pub struct Reconciler {
    tx: mpsc::Sender<Event>,
    dispatcher: JoinHandle<()>,
}

#[derive(Clone)]
struct Context {
    registry: Arc<SchemaRegistry>,
    links: Arc<LinkService>,
}

impl Reconciler {
    /// Spawns the dispatcher. `capacity` bounds the event queue; senders
    /// wait while it is full.
    pub fn spawn(registry: Arc<SchemaRegistry>, links: Arc<LinkService>, capacity: usize) -> Reconciler {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let dispatcher = tokio::spawn(dispatch(Context { registry, links }, rx));

        Reconciler { tx, dispatcher }
    }

    pub async fn send(&self, event: Event) -> Result<()> {
        self.tx.send(event).await.map_err(|err| {
            strata_core::err!(
                "reconciler is shut down; event for database `{}` dropped",
                err.0.database()
            )
        })
    }

    /// A sender for producers that outlive a borrow of the reconciler.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    /// Stops accepting events and waits until every queued event has been
    /// handled. Senders obtained through [`Reconciler::sender`] keep the
    /// queue open until they are dropped.
    pub async fn shutdown(self) {
        drop(self.tx);

        if let Err(err) = self.dispatcher.await {
            error!(error = %err, "reconciliation dispatcher ended abnormally");
        }
    }
}

async fn dispatch(cx: Context, mut rx: mpsc::Receiver<Event>) {
    let mut workers = Workers::new(cx);

    while let Some(event) = rx.recv().await {
        workers.route(event);
    }

    workers.shutdown().await;
}

/// Per-database workers.
///
/// A deleted database's worker is retired: its queue is closed and it exits
/// once the queued events are handled. A later worker for the same name
/// waits for the retired one first.
struct Workers {
    cx: Context,
    active: HashMap<String, Worker>,
    retired: HashMap<String, JoinHandle<()>>,
}

struct Worker {
    tx: mpsc::UnboundedSender<Event>,
    handle: JoinHandle<()>,
}

impl Workers {
    fn new(cx: Context) -> Workers {
        Workers {
            cx,
            active: HashMap::new(),
            retired: HashMap::new(),
        }
    }

    fn route(&mut self, event: Event) {
        let database = event.database().to_string();
        let deleted = matches!(event, Event::DatabaseDeleted(_));

        let worker = match self.active.entry(database.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(database = %database, "starting reconciliation worker");
                let (tx, rx) = mpsc::unbounded_channel();
                let previous = self.retired.remove(&database);
                let handle = tokio::spawn(work(self.cx.clone(), database.clone(), previous, rx));
                entry.insert(Worker { tx, handle })
            }
        };

        if worker.tx.send(event).is_err() {
            error!(database = %database, "reconciliation worker is gone; event dropped");
        }

        if deleted {
            if let Some(worker) = self.active.remove(&database) {
                debug!(database = %database, "retiring reconciliation worker");
                self.retired.insert(database, worker.handle);
            }
        }

        self.retired.retain(|_, handle| !handle.is_finished());
    }

    async fn shutdown(self) {
        let handles = self
            .active
            .into_iter()
            .map(|(database, worker)| (database, worker.handle))
            .chain(self.retired);

        for (database, handle) in handles {
            if let Err(err) = handle.await {
                error!(database = %database, error = %err, "reconciliation worker ended abnormally");
            }
        }
    }
}

async fn work(
    cx: Context,
    database: String,
    previous: Option<JoinHandle<()>>,
    mut rx: mpsc::UnboundedReceiver<Event>,
) {
    if let Some(previous) = previous {
        if let Err(err) = previous.await {
            error!(database = %database, error = %err, "retired reconciliation worker ended abnormally");
        }
    }

    while let Some(event) = rx.recv().await {
        if let Err(err) = cx.react(event).await {
            error!(database = %database, error = %err, "reconciliation failed");
        }
    }
}

impl Context {
    async fn react(&self, event: Event) -> Result<()> {
        match event {
            Event::SchemaCreated(schema) | Event::SchemaUpdated(schema) => {
                let database = schema.database.clone();
                self.registry.register(schema, Origin::Database).await;
                self.sync(&database).await
            }
            Event::DatabaseCreated(def) => {
                let name = def.name.clone();
                let schemas = self.registry.find_by_database(&name).await;
                let link = self.links.create(def, schemas).await?;

                let imported = self.links.discover(&link).await?;
                for schema in imported {
                    self.registry.register(schema, Origin::Database).await;
                }

                info!(database = %name, "database connected");
                Ok(())
            }
            Event::DatabaseDeleted(name) => {
                if self.links.remove(&name).await? {
                    info!(database = %name, "database disconnected");
                }
                Ok(())
            }
        }
    }

    /// Re-applies the registered schemas of `database` to its link.
    async fn sync(&self, database: &str) -> Result<()> {
        let Some(link) = self.links.find_by_name(database).await else {
            debug!(database = %database, "no live link; schema kept in registry only");
            return Ok(());
        };

        let schemas = self.registry.find_by_database(database).await;
        let report = link.set_schemas(schemas).await?;

        if !report.failed.is_empty() {
            return Err(strata_core::err!(
                "migrations failed for {}",
                report.failed.join(", ")
            ));
        }

        Ok(())
    }
}
