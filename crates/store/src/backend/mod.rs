//! Raw key/value backends.
//!
//! The typed store only talks to the host's storage through [`RawBackend`].
//! Two reference implementations are provided: an in-memory map and a
//! JSON-file-backed map.

use async_trait::async_trait;

use crate::errors::{Result, StoreError};
use crate::scope::Scope;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Host-provided raw storage. Each call is assumed to be atomic on its own;
/// nothing is assumed about sequences of calls.
#[async_trait]
pub trait RawBackend: Send + Sync {
    async fn raw_get(&self, key: &str, scope: &Scope) -> Result<Option<String>>;
    async fn raw_set(&self, key: &str, value: String, scope: &Scope) -> Result<()>;
    /// Removing an absent key is not an error.
    async fn raw_unset(&self, key: &str, scope: &Scope) -> Result<()>;

    /// All `(key, raw value)` pairs of a scope in key order.
    async fn raw_entries(&self, _scope: &Scope) -> Result<Vec<(String, String)>> {
        Err(StoreError::Unsupported("listing entries"))
    }
}
