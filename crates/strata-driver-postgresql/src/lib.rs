mod catalog;

mod value;
pub(crate) use value::Value;

use futures::{pin_mut, TryStreamExt};
use strata_core::{
    async_trait,
    driver::{CatalogTable, Capability, Driver, Operation, Response},
    schema::{
        db::{Migration, TableDiff},
        Dialect,
    },
    stmt, Error, Result,
};
use strata_sql as sql;
use tokio_postgres::{types::ToSql, Client, Config, NoTls};
use url::Url;

#[derive(Debug)]
pub struct PostgreSQL {
    config: Config,
}

impl PostgreSQL {
    /// Creates a PostgreSQL driver from a `postgres://` or `postgresql://`
    /// connection URL. No connection is opened until [`Driver::connect`].
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={}",
                url_str
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url_str}"))
        })?;

        if url.path().is_empty() || url.path() == "/" {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={}",
                url_str
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(url.path().trim_start_matches('/'));

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        Ok(Self { config })
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn connect(&self) -> Result<Box<dyn strata_core::Connection>> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgresql connection error");
            }
        });

        Ok(Box::new(Connection { client }))
    }

    fn generate_migration(&self, diff: &TableDiff<'_>) -> Migration {
        sql::generate_migration(&sql::Serializer::postgresql(), diff, &Capability::POSTGRESQL)
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
}

impl From<Client> for Connection {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

impl Connection {
    async fn apply_migration(&mut self, migration: &Migration) -> Result<Response> {
        let statements = migration.statements();

        let transaction = self
            .client
            .transaction()
            .await
            .map_err(Error::driver_operation_failed)?;

        for statement in &statements {
            tracing::debug!(sql = %statement, "applying migration statement");
            transaction
                .batch_execute(statement)
                .await
                .map_err(Error::driver_operation_failed)?;
        }

        transaction
            .commit()
            .await
            .map_err(Error::driver_operation_failed)?;

        Ok(Response::count(statements.len() as u64))
    }

    async fn query(&mut self, stmt: stmt::Statement) -> Result<Response> {
        let returns_rows = match &stmt {
            stmt::Statement::Query(_) => true,
            stmt::Statement::Insert(insert) => insert.returning.is_some(),
            _ => false,
        };

        let mut params: Vec<stmt::Value> = Vec::new();
        let sql_as_str = sql::Serializer::postgresql().serialize(&stmt.into(), &mut params);

        tracing::trace!(sql = %sql_as_str, params = params.len(), "executing statement");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        if returns_rows {
            let args = params
                .iter()
                .map(|param| (param as &(dyn ToSql + Sync), param.postgres_ty()))
                .collect::<Vec<_>>();

            let rows = self
                .client
                .query_typed(&sql_as_str, &args)
                .await
                .map_err(Error::driver_operation_failed)?;

            let mut ret = Vec::with_capacity(rows.len());
            for row in &rows {
                let mut record = Vec::with_capacity(row.len());
                for (index, column) in row.columns().iter().enumerate() {
                    record.push(Value::from_row(row, index, column)?);
                }
                ret.push(record);
            }

            return Ok(Response::values(ret));
        }

        let stream = self
            .client
            .query_typed_raw(
                &sql_as_str,
                params.iter().map(|param| (param, param.postgres_ty())),
            )
            .await
            .map_err(Error::driver_operation_failed)?;
        pin_mut!(stream);

        while stream
            .try_next()
            .await
            .map_err(Error::driver_operation_failed)?
            .is_some()
        {}

        Ok(Response::count(stream.rows_affected().unwrap_or(0)))
    }
}

#[async_trait]
impl strata_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::ApplyMigration(migration) => self.apply_migration(&migration).await,
            Operation::QuerySql(stmt) => self.query(stmt).await,
        }
    }

    async fn introspect(&mut self) -> Result<Vec<CatalogTable>> {
        catalog::introspect(&self.client).await
    }
}
