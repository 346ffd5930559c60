//! `PostgreSQL` adapters for client task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresClientTaskRepository, WorklistPgPool};
