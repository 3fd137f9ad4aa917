//! Runtime schema management for relational databases.
//!
//! Schemas are declared as engine-neutral documents ([`SchemaDef`]), kept in
//! a [`SchemaRegistry`] and materialized against live databases through
//! [`Link`]s. The bootstrap database persists schema and database
//! definitions so they survive restarts; see [`bootstrap`].

mod bootstrap;
pub use bootstrap::{bootstrap, Strata};

pub mod config;
pub use config::StrataConfig;

pub mod database;
pub use database::DatabaseService;

mod driver;

pub mod link;
pub use link::{Link, LinkState, Materialization, SyncReport};

pub mod link_service;
pub use link_service::LinkService;

pub mod model;
pub use model::{ModelHandle, Record};

pub mod reconcile;
pub use reconcile::{Event, Reconciler};

pub mod registry;
pub use registry::{Origin, SchemaRegistry};

pub use strata_core::{
    schema::{
        app::{
            DatabaseDef, Field, FieldTag, FieldType, IndexDef, SchemaDef, SchemaKey, TypeParams,
            TAG_IMPORTED, TAG_READONLY, TAG_SYSTEM,
        },
        Dialect,
    },
    Error, ErrorClass, Result,
};

#[doc(hidden)]
pub use strata_core as core;
