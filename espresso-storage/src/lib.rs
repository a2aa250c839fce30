//! espresso-storage: SQLite persistence for the co-occurrence matrix,
//! its frequency tables, and promoted instances and patterns.

pub mod connection;
pub mod engine;
pub mod export;
pub mod ingest;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
pub use engine::StorageEngine;
