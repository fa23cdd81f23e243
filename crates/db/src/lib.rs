//! `db` crate: pure persistence layer.
//!
//! Provides a connection pool, a readiness probe, embedded migrations, typed
//! row structs, and repository functions for every table in the schema.
//! No business logic lives here.

pub mod error;
pub mod pool;
pub mod probe;
pub mod repository;
pub mod models;

pub use pool::DbPool;
pub use error::DbError;
