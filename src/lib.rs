//! graphpg - openCypher to PostgreSQL translation for property graphs.
//!
//! This crate turns an already-parsed openCypher query tree into a
//! PostgreSQL statement plus a parameter table, targeting a relational
//! node/edge storage schema:
//! - Variable/parameter binding and type inference
//! - A multi-pass rewrite pipeline (pattern lifting, existential
//!   subqueries, operator desugaring, mutation descriptors)
//! - SQL emission, including recursive CTEs for variable-length
//!   relationship traversal
//!
//! Translation is a pure in-memory transformation: one call owns its query
//! tree and binder state, so concurrent calls need no locking beyond a
//! shared read-only kind catalog.

pub mod cypher;
pub mod graph_catalog;
pub mod pgsql;

pub use graph_catalog::{InMemoryKindCatalog, KindMapper};
pub use pgsql::{rewrite, translate, Emitter, TranslateError, Translation};
