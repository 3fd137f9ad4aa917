mod discover;
mod task;

use crate::{model::ModelHandle, Error, Result};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strata_core::{
    driver::Response,
    schema::{
        app::{DatabaseDef, SchemaDef},
        db::Migration,
        CompiledModel, Dialect,
    },
    stmt::Statement,
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use indexmap::IndexMap;

/// Lifecycle of a link's native connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Active,
    Closed,
}

/// Whether the link has applied a schema set yet.
///
/// The first synchronization creates every managed table if it does not
/// exist. Later synchronizations diff against the previously applied models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    Empty,
    Populated,
}

/// Outcome of one [`Link::set_schemas`] call. Entries are schema references.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<String>,

    /// Schemas whose table was already present when it was first
    /// synchronized. `CREATE TABLE IF NOT EXISTS` leaves such a table as it
    /// is, even when its columns differ from the model.
    pub existing: Vec<String>,

    pub altered: Vec<String>,
    pub unchanged: Vec<String>,

    /// Schemas that did not compile, or belong to another database.
    pub skipped: Vec<String>,

    /// Schemas whose migration failed. The previously applied model stays
    /// tracked for them; a schema that was never applied is not tracked.
    pub failed: Vec<String>,

    /// Applied migrations, in order.
    pub migrations: Vec<Migration>,
}

impl SyncReport {
    pub fn is_destructive(&self) -> bool {
        self.migrations.iter().any(Migration::is_destructive)
    }

    /// Returns `true` when no statement was issued.
    pub fn is_noop(&self) -> bool {
        self.migrations.is_empty()
    }
}

/// A live binding between one database definition and its native connection.
///
/// The connection is owned by a dedicated task; every operation is sent to it
/// over a channel, so operations on one link never interleave. Clones share
/// the same task.
#[derive(Clone)]
pub struct Link {
    shared: Arc<Shared>,
    conn: Arc<ConnHandle>,
}

/// State readable without a round trip to the connection task.
pub(crate) struct Shared {
    pub(crate) def: DatabaseDef,
    pub(crate) dialect: Dialect,
    state: Mutex<LinkState>,
    materialization: Mutex<Materialization>,
    models: Mutex<IndexMap<String, Arc<CompiledModel>>>,
}

struct ConnHandle {
    in_tx: mpsc::UnboundedSender<LinkOp>,
    join_handle: Mutex<Option<JoinHandle<()>>>,
}

/// Operations sent to the connection task.
pub(crate) enum LinkOp {
    SetSchemas {
        schemas: Vec<SchemaDef>,
        tx: oneshot::Sender<Result<SyncReport>>,
    },
    Discover {
        tx: oneshot::Sender<Result<Vec<SchemaDef>>>,
    },
    Exec {
        stmt: Statement,
        tx: oneshot::Sender<Result<Response>>,
    },
    Close {
        tx: oneshot::Sender<Result<()>>,
    },
}

impl Link {
    /// Opens the native connection for `def` and spawns the connection task.
    ///
    /// Fails without leaving anything running when the driver cannot be
    /// built or the engine is unreachable.
    pub async fn connect(def: DatabaseDef) -> Result<Link> {
        let driver = crate::driver::driver_for(&def)
            .map_err(|err| err.context(strata_core::err!("connecting database `{}`", def.name)))?;

        let shared = Arc::new(Shared {
            dialect: driver.dialect(),
            def,
            state: Mutex::new(LinkState::Connecting),
            materialization: Mutex::new(Materialization::Empty),
            models: Mutex::new(IndexMap::new()),
        });

        let connection = driver.connect().await.map_err(|err| {
            err.context(strata_core::err!(
                "connecting database `{}`",
                shared.def.name
            ))
        })?;

        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let join_handle = tokio::spawn(task::run(
            task::Task::new(driver, connection, shared.clone()),
            in_rx,
        ));

        shared.set_state(LinkState::Active);
        tracing::info!(database = %shared.def.name, dialect = %shared.dialect, "link active");

        Ok(Link {
            shared,
            conn: Arc::new(ConnHandle {
                in_tx,
                join_handle: Mutex::new(Some(join_handle)),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.shared.def.name
    }

    pub fn definition(&self) -> &DatabaseDef {
        &self.shared.def
    }

    pub fn dialect(&self) -> Dialect {
        self.shared.dialect
    }

    pub fn state(&self) -> LinkState {
        *lock(&self.shared.state)
    }

    pub fn materialization(&self) -> Materialization {
        *lock(&self.shared.materialization)
    }

    /// Compiles `schemas` and brings the database in line with them.
    ///
    /// Schemas that fail to compile are logged and skipped. Each table is
    /// migrated on its own; one failing table does not hold back the others.
    /// References tracked before but absent from `schemas` are untracked.
    /// Their tables are left in place.
    pub async fn set_schemas(&self, schemas: Vec<SchemaDef>) -> Result<SyncReport> {
        self.request(|tx| LinkOp::SetSchemas { schemas, tx }).await
    }

    /// Imports every untracked table from the engine catalog as a schema
    /// tagged `imported`. The imported schemas are tracked, so calling this
    /// again returns only tables created in the meantime.
    pub async fn discover(&self) -> Result<Vec<SchemaDef>> {
        self.request(|tx| LinkOp::Discover { tx }).await
    }

    pub async fn exec(&self, stmt: Statement) -> Result<Response> {
        self.request(|tx| LinkOp::Exec { stmt, tx }).await
    }

    /// Releases the native connection. Closing twice fails with
    /// [`Error::link_closed`].
    pub async fn close(&self) -> Result<()> {
        {
            let mut state = lock(&self.shared.state);
            if *state == LinkState::Closed {
                return Err(Error::link_closed(self.name()));
            }
            *state = LinkState::Closed;
        }

        let (tx, rx) = oneshot::channel();
        self.conn
            .in_tx
            .send(LinkOp::Close { tx })
            .map_err(|_| Error::link_closed(self.name()))?;
        let result = rx.await.map_err(|_| Error::link_closed(self.name()))?;

        let join_handle = lock(&self.conn.join_handle).take();
        if let Some(join_handle) = join_handle {
            if let Err(err) = join_handle.await {
                tracing::warn!(database = %self.name(), error = %err, "link task ended abnormally");
            }
        }

        tracing::info!(database = %self.name(), "link closed");
        result
    }

    /// Returns a handle on the tracked model named `reference`.
    pub fn model(&self, reference: &str) -> Result<ModelHandle> {
        let model = lock(&self.shared.models)
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::not_registered(self.name(), Some(reference)))?;

        Ok(ModelHandle::new(self.clone(), model))
    }

    /// Currently tracked models, in synchronization order.
    pub fn models(&self) -> Vec<Arc<CompiledModel>> {
        lock(&self.shared.models).values().cloned().collect()
    }

    pub fn is_tracked(&self, reference: &str) -> bool {
        lock(&self.shared.models).contains_key(reference)
    }

    async fn request<T>(&self, op: impl FnOnce(oneshot::Sender<Result<T>>) -> LinkOp) -> Result<T> {
        if self.state() == LinkState::Closed {
            return Err(Error::link_closed(self.name()));
        }

        let (tx, rx) = oneshot::channel();
        self.conn
            .in_tx
            .send(op(tx))
            .map_err(|_| Error::link_closed(self.name()))?;

        rx.await.map_err(|_| Error::link_closed(self.name()))?
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("database", &self.shared.def.name)
            .field("dialect", &self.shared.dialect)
            .field("state", &self.state())
            .finish()
    }
}

impl Shared {
    fn set_state(&self, state: LinkState) {
        *lock(&self.state) = state;
    }

    pub(crate) fn materialization(&self) -> Materialization {
        *lock(&self.materialization)
    }

    pub(crate) fn set_materialization(&self, materialization: Materialization) {
        *lock(&self.materialization) = materialization;
    }

    pub(crate) fn models(&self) -> IndexMap<String, Arc<CompiledModel>> {
        lock(&self.models).clone()
    }

    pub(crate) fn replace_models(&self, models: IndexMap<String, Arc<CompiledModel>>) {
        *lock(&self.models) = models;
    }

    /// Tracks `model`. Returns `false` when the reference is already taken.
    pub(crate) fn track(&self, model: CompiledModel) -> bool {
        let mut models = lock(&self.models);
        if models.contains_key(&model.reference) {
            return false;
        }
        models.insert(model.reference.clone(), Arc::new(model));
        true
    }
}

/// Locks `mutex`, recovering the guard if a previous holder panicked. The
/// guarded values are replaced wholesale, so they are never left torn.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
