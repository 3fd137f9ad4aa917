mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};
use strata_core::{
    async_trait,
    driver::{CatalogColumn, CatalogTable, Capability, Driver, Operation, Response},
    schema::{
        db::{Migration, TableDiff, Type},
        Dialect,
    },
    stmt, Error, Result,
};
use strata_sql as sql;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "no database file specified; url={url_str}"
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn strata_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    fn generate_migration(&self, diff: &TableDiff<'_>) -> Migration {
        sql::generate_migration(&sql::Serializer::sqlite(), diff, &Capability::SQLITE)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        let sqlite = Self { connection };
        Ok(sqlite)
    }

    fn apply_migration(&mut self, migration: &Migration) -> Result<Response> {
        let statements = migration.statements();

        self.connection
            .execute_batch("BEGIN")
            .map_err(Error::driver_operation_failed)?;

        for statement in &statements {
            tracing::debug!(sql = %statement, "applying migration statement");

            if let Err(e) = self
                .connection
                .execute_batch(statement)
                .map_err(Error::driver_operation_failed)
            {
                self.connection
                    .execute_batch("ROLLBACK")
                    .map_err(Error::driver_operation_failed)?;
                return Err(e);
            }
        }

        self.connection
            .execute_batch("COMMIT")
            .map_err(Error::driver_operation_failed)?;

        Ok(Response::count(statements.len() as u64))
    }

    fn query(&mut self, stmt: stmt::Statement) -> Result<Response> {
        // Storage types of the returned columns, if the statement returns rows
        let ret_tys: Option<Vec<Type>> = match &stmt {
            stmt::Statement::Query(query) => {
                Some(query.columns.iter().map(|c| c.ty.clone()).collect())
            }
            stmt::Statement::Insert(insert) => {
                insert.returning.as_ref().map(|c| vec![c.ty.clone()])
            }
            _ => None,
        };

        let mut params: Vec<stmt::Value> = vec![];
        let sql_str = sql::Serializer::sqlite().serialize(&stmt.into(), &mut params);

        tracing::trace!(sql = %sql_str, params = params.len(), "executing statement");

        let mut stmt = self
            .connection
            .prepare_cached(&sql_str)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let Some(ret_tys) = ret_tys else {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)?;

            return Ok(Response::count(count as _));
        };

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut items = Vec::with_capacity(ret_tys.len());

            for (index, ty) in ret_tys.iter().enumerate() {
                items.push(Value::from_sql(row, index, ty)?.into_inner());
            }

            ret.push(items);
        }

        Ok(Response::values(ret))
    }

    fn table_names(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT name, COALESCE(sql, '') FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
                 AND name NOT LIKE '\\_strata\\_%' ESCAPE '\\' \
                 ORDER BY name",
            )
            .map_err(Error::driver_operation_failed)?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(Error::driver_operation_failed)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver_operation_failed)
    }

    fn describe_table(&self, name: &str, ddl: &str) -> Result<CatalogTable> {
        let pragma = format!("PRAGMA table_info(\"{}\")", name.replace('"', "\"\""));
        let mut stmt = self
            .connection
            .prepare(&pragma)
            .map_err(Error::driver_operation_failed)?;

        // (column, primary key position)
        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let raw_type: String = row.get(2)?;
                let not_null: bool = row.get(3)?;
                let default: Option<String> = row.get(4)?;
                let pk: i64 = row.get(5)?;

                let mut column = CatalogColumn::new(name, &raw_type);
                column.nullable = !not_null && pk == 0;
                column.default = default;
                Ok((column, pk))
            })
            .map_err(Error::driver_operation_failed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver_operation_failed)?;

        let mut keyed: Vec<(i64, String)> = rows
            .iter()
            .filter(|(_, pk)| *pk > 0)
            .map(|(column, pk)| (*pk, column.name.clone()))
            .collect();
        keyed.sort();
        let primary_key: Vec<String> = keyed.into_iter().map(|(_, name)| name).collect();

        // Only a sole `INTEGER PRIMARY KEY` declared AUTOINCREMENT counts
        let autoincrement =
            primary_key.len() == 1 && ddl.to_ascii_uppercase().contains("AUTOINCREMENT");

        let columns = rows
            .into_iter()
            .map(|(mut column, pk)| {
                column.auto_increment = autoincrement && pk == 1 && column.raw_type == "INTEGER";
                column
            })
            .collect();

        Ok(CatalogTable {
            name: name.to_string(),
            columns,
            primary_key,
        })
    }
}

#[async_trait]
impl strata_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::ApplyMigration(migration) => self.apply_migration(&migration),
            Operation::QuerySql(stmt) => self.query(stmt),
        }
    }

    async fn introspect(&mut self) -> Result<Vec<CatalogTable>> {
        let mut tables = vec![];

        for (name, ddl) in self.table_names()? {
            tables.push(self.describe_table(&name, &ddl)?);
        }

        Ok(tables)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.connection
            .close()
            .map_err(|(_, err)| Error::driver_operation_failed(err))
    }
}
