//! # Storage Module
//!
//! Handles all data persistence for the stamp card app.
//!
//! The domain layer only sees the [`KeyValueStorage`] trait: a string-keyed,
//! string-valued store with atomic single-key writes. Repositories on top of
//! it own the key names and the JSON encoding of each record.
//!
//! ## Backends
//!
//! - **MemoryStorage**: in-process map, used by tests and embedders
//! - **FileStorage**: one file per key in the app's data directory
//!
//! App configuration (`app_config.yaml`) lives next to the key files and is
//! handled by [`ConfigRepository`].

pub mod config_repository;
pub mod file;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use config_repository::{AppConfig, ConfigRepository};
pub use file::{FileConnection, FileStorage};
pub use memory::MemoryStorage;
pub use repositories::{MilestoneRepository, PreferenceRepository, StampCardRepository};
pub use traits::KeyValueStorage;
