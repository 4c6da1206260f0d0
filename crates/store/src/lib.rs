//! Typed variables over an opaque scoped key/value backend.
//!
//! - Values are numbers, strings or booleans, stored as tagged strings.
//! - `increment` and `update` run under a per-(key, scope) lock, so
//!   read-modify-write sequences never lose updates even though the backend
//!   only offers independent get/set/unset calls.
//! - The backend is injected through [`RawBackend`]; in-memory and JSON-file
//!   implementations are included.

pub mod backend;
pub mod delta;
pub mod errors;
pub mod locks;
pub mod metrics;
pub mod scope;
pub mod store;
pub mod value;

pub use backend::{JsonFileBackend, MemoryBackend, RawBackend};
pub use delta::IncrementBy;
pub use errors::{Result, StoreError};
pub use scope::Scope;
pub use store::TypedStore;
pub use value::TypedValue;
