//! File-backed storage: one file per key under a single data directory.

pub mod connection;
pub mod file_storage;

pub use connection::FileConnection;
pub use file_storage::FileStorage;
