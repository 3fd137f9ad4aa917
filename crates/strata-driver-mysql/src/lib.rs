mod catalog;

mod value;
pub(crate) use value::Value;

use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Pool,
};
use strata_core::{
    async_trait,
    driver::{CatalogTable, Capability, Driver, Operation, Response},
    schema::{
        db::{Migration, TableDiff, Type},
        Dialect,
    },
    stmt, Error, Result,
};
use strata_sql as sql;
use url::Url;

#[derive(Debug)]
pub struct MySQL {
    pool: Pool,
}

impl MySQL {
    /// Creates a MySQL driver from a `mysql://` or `mariadb://` connection
    /// URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let mut url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        match url.scheme() {
            "mysql" => {}
            // MariaDB speaks the MySQL protocol
            "mariadb" => {
                url.set_scheme("mysql").map_err(|_| {
                    Error::invalid_connection_url(format!("cannot rewrite scheme; url={url_str}"))
                })?;
            }
            _ => {
                return Err(Error::invalid_connection_url(format!(
                    "connection url does not have a `mysql` scheme; url={}",
                    url_str
                )));
            }
        }

        url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url_str}"))
        })?;

        if url.path().is_empty() || url.path() == "/" {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={}",
                url_str
            )));
        }

        let opts = mysql_async::Opts::from_url(url.as_ref())
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        let pool = Pool::new(opts);
        Ok(Self { pool })
    }
}

impl From<Pool> for MySQL {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Driver for MySQL {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn strata_core::Connection>> {
        let conn = self
            .pool
            .get_conn()
            .await
            .map_err(Error::driver_operation_failed)?;
        Ok(Box::new(Connection::new(conn)))
    }

    fn generate_migration(&self, diff: &TableDiff<'_>) -> Migration {
        sql::generate_migration(&sql::Serializer::mysql(), diff, &Capability::MYSQL)
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Runs each statement in turn. MySQL commits DDL implicitly, so a
    /// failure leaves the earlier statements applied.
    async fn apply_migration(&mut self, migration: &Migration) -> Result<Response> {
        let statements = migration.statements();

        for statement in &statements {
            tracing::debug!(sql = %statement, "applying migration statement");
            self.conn
                .query_drop(*statement)
                .await
                .map_err(Error::driver_operation_failed)?;
        }

        Ok(Response::count(statements.len() as u64))
    }

    async fn query(&mut self, mut stmt: stmt::Statement) -> Result<Response> {
        let ret_tys: Option<Vec<Type>> = match &stmt {
            stmt::Statement::Query(query) => {
                Some(query.columns.iter().map(|c| c.ty.clone()).collect())
            }
            _ => None,
        };

        // No RETURNING in MySQL. The generated key is read back through
        // LAST_INSERT_ID instead.
        let returning = match &mut stmt {
            stmt::Statement::Insert(insert) => insert.returning.take(),
            _ => None,
        };

        let mut params: Vec<stmt::Value> = Vec::new();
        let sql_as_str = sql::Serializer::mysql().serialize(&stmt.into(), &mut params);

        tracing::trace!(sql = %sql_as_str, params = params.len(), "executing statement");

        let args = params
            .into_iter()
            .map(|param| Value::from(param).to_value())
            .collect::<Vec<_>>();

        let statement = self
            .conn
            .prep(&sql_as_str)
            .await
            .map_err(Error::driver_operation_failed)?;

        let Some(ret_tys) = ret_tys else {
            self.conn
                .exec_drop(&statement, mysql_async::Params::Positional(args))
                .await
                .map_err(Error::driver_operation_failed)?;

            if returning.is_some() {
                let id = self
                    .conn
                    .last_insert_id()
                    .ok_or_else(|| strata_core::err!("LAST_INSERT_ID() returned no value"))?;
                let id = i64::try_from(id).map_err(Error::driver_operation_failed)?;
                return Ok(Response::values(vec![vec![stmt::Value::I64(id)]]));
            }

            return Ok(Response::count(self.conn.affected_rows()));
        };

        let rows: Vec<mysql_async::Row> = self
            .conn
            .exec(&statement, mysql_async::Params::Positional(args))
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut ret = Vec::with_capacity(rows.len());
        for row in rows {
            let values = row.unwrap();
            let mut record = Vec::with_capacity(ret_tys.len());
            for (value, ty) in values.into_iter().zip(&ret_tys) {
                record.push(Value::from_sql(value, ty)?);
            }
            ret.push(record);
        }

        Ok(Response::values(ret))
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
        catalog::introspect(&mut self.conn).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .disconnect()
            .await
            .map_err(Error::driver_operation_failed)
    }
}
