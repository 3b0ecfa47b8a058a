//! # Storage Traits
//!
//! This module defines the storage abstraction the domain layer is written
//! against. The app only ever needs a string-keyed, string-valued store with
//! atomic single-key reads and writes, so that is the whole contract.

use anyhow::Result;
use async_trait::async_trait;

/// Trait defining the interface for key-value persistence
///
/// Implementations must make `set` atomic per key: a reader sees either the
/// previous value or the new one, never a partial write. There are no
/// transactions across keys.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
