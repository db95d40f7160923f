//! vela-adapter-postgres - PostgreSQL 适配器

pub mod connection;

pub use connection::*;
