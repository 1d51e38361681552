//! PostgreSQL persistence layer for caseline.
//!
//! Owns the connection pool, embedded migrations, row models, and the
//! query functions the service layer delegates to.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
