use super::{discover, LinkOp, Materialization, Shared, SyncReport};
use crate::Result;

use indexmap::IndexMap;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use strata_core::{
    driver::{Operation, Response},
    schema::{
        app::SchemaDef,
        compile,
        db::{Migration, TableDiff},
        CompiledModel,
    },
    stmt::Statement,
    Connection, Driver,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The connection task's state. Only the task touches the connection.
pub(super) struct Task {
    driver: Box<dyn Driver>,
    conn: Box<dyn Connection>,
    shared: Arc<Shared>,
}

pub(super) async fn run(mut task: Task, mut in_rx: mpsc::UnboundedReceiver<LinkOp>) {
    while let Some(op) = in_rx.recv().await {
        match op {
            LinkOp::SetSchemas { schemas, tx } => {
                let _ = tx.send(task.set_schemas(schemas).await);
            }
            LinkOp::Discover { tx } => {
                let _ = tx.send(task.discover().await);
            }
            LinkOp::Exec { stmt, tx } => {
                let _ = tx.send(task.exec(stmt).await);
            }
            LinkOp::Close { tx } => {
                let _ = tx.send(task.conn.close().await);
                return;
            }
        }
    }

    // Every handle was dropped without closing.
    if let Err(err) = task.conn.close().await {
        warn!(database = %task.shared.def.name, error = %err, "failed to release connection");
    }
}

impl Task {
    pub(super) fn new(driver: Box<dyn Driver>, conn: Box<dyn Connection>, shared: Arc<Shared>) -> Task {
        Task {
            driver,
            conn,
            shared,
        }
    }

    fn database(&self) -> &str {
        &self.shared.def.name
    }

    async fn exec(&mut self, stmt: Statement) -> Result<Response> {
        self.conn.exec(Operation::QuerySql(stmt)).await
    }

    async fn set_schemas(&mut self, schemas: Vec<SchemaDef>) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let mut next = self.compile_all(&schemas, &mut report);

        let previous = self.shared.models();
        let populated = self.shared.materialization() == Materialization::Populated;

        // Tables a first CREATE would find already present.
        let needs_catalog = next.iter().any(|(reference, model)| {
            model.managed && !(populated && previous.contains_key(reference))
        });
        let existing: HashSet<String> = if needs_catalog {
            self.conn
                .introspect()
                .await?
                .into_iter()
                .map(|table| table.name)
                .collect()
        } else {
            HashSet::new()
        };

        let mut never_applied = vec![];

        for (reference, model) in next.iter_mut() {
            if !model.managed {
                debug!(database = %self.database(), schema = %reference, "tracking unmanaged schema");
                report.unchanged.push(reference.clone());
                continue;
            }

            let before = previous.get(reference).filter(|_| populated);

            let (migration, created) = {
                let hints = before
                    .map(|before| model.rename_hints(before))
                    .unwrap_or_default();

                let Some(diff) =
                    TableDiff::between(before.map(|before| &before.table), &model.table, &hints)
                else {
                    report.unchanged.push(reference.clone());
                    continue;
                };

                let created = matches!(diff, TableDiff::CreateTable(_));
                (self.driver.generate_migration(&diff), created)
            };

            match self.apply(&migration).await {
                Ok(()) => {
                    if created && existing.contains(model.table_name()) {
                        report.existing.push(reference.clone());
                    } else if created {
                        report.created.push(reference.clone());
                    } else {
                        report.altered.push(reference.clone());
                    }
                    report.migrations.push(migration);
                }
                Err(err) => {
                    error!(
                        database = %self.database(),
                        table = %model.table_name(),
                        error = %err,
                        "migration failed"
                    );
                    report.failed.push(reference.clone());

                    match before {
                        Some(before) => *model = before.clone(),
                        None => never_applied.push(reference.clone()),
                    }
                }
            }
        }

        // Left untracked so the next synchronization retries the CREATE.
        for reference in &never_applied {
            next.shift_remove(reference);
        }

        for reference in previous.keys().filter(|r| !next.contains_key(*r)) {
            debug!(database = %self.database(), schema = %reference, "untracking schema");
        }

        self.shared.replace_models(next);
        self.shared.set_materialization(Materialization::Populated);

        info!(
            database = %self.database(),
            created = report.created.len(),
            existing = report.existing.len(),
            altered = report.altered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "schemas synchronized"
        );

        Ok(report)
    }

    /// Compiles every schema bound to this database. Failures and table name
    /// collisions are logged and recorded as skipped.
    fn compile_all(
        &self,
        schemas: &[SchemaDef],
        report: &mut SyncReport,
    ) -> IndexMap<String, Arc<CompiledModel>> {
        let mut next = IndexMap::new();
        let mut tables: HashMap<String, String> = HashMap::new();

        for schema in schemas {
            if schema.database != self.database() {
                warn!(
                    database = %self.database(),
                    schema = %schema.key(),
                    "schema belongs to another database"
                );
                report.skipped.push(schema.reference.clone());
                continue;
            }

            let model = match compile(schema, self.shared.dialect) {
                Ok(model) => model,
                Err(err) => {
                    warn!(
                        database = %self.database(),
                        schema = %schema.reference,
                        error = %err,
                        "skipping schema that does not compile"
                    );
                    report.skipped.push(schema.reference.clone());
                    continue;
                }
            };

            if let Some(owner) = tables.get(model.table_name()) {
                warn!(
                    database = %self.database(),
                    schema = %schema.reference,
                    table = %model.table_name(),
                    owner = %owner,
                    "table already bound to another schema"
                );
                report.skipped.push(schema.reference.clone());
                continue;
            }

            tables.insert(model.table_name().to_string(), model.reference.clone());
            next.insert(model.reference.clone(), Arc::new(model));
        }

        next
    }

    async fn apply(&mut self, migration: &Migration) -> Result<()> {
        self.conn
            .exec(Operation::ApplyMigration(migration.clone()))
            .await?;
        Ok(())
    }

    async fn discover(&mut self) -> Result<Vec<SchemaDef>> {
        let catalog = self.conn.introspect().await?;

        let tracked: HashSet<String> = self
            .shared
            .models()
            .values()
            .map(|model| model.table_name().to_string())
            .collect();

        let capability = self.driver.capability();
        let mut imported = vec![];

        for table in catalog.iter().filter(|t| !tracked.contains(&t.name)) {
            if discover::is_internal(&table.name) {
                continue;
            }

            let schema = discover::import_table(self.database(), table, capability);

            let model = match compile(&schema, self.shared.dialect) {
                Ok(model) => model,
                Err(err) => {
                    warn!(
                        database = %self.database(),
                        table = %table.name,
                        error = %err,
                        "skipping table that cannot be imported"
                    );
                    continue;
                }
            };

            if !self.shared.track(model) {
                warn!(
                    database = %self.database(),
                    table = %table.name,
                    "reference already tracked for another table"
                );
                continue;
            }

            debug!(database = %self.database(), table = %table.name, "imported table");
            imported.push(schema);
        }

        info!(database = %self.database(), imported = imported.len(), "discovery finished");
        Ok(imported)
    }
}
