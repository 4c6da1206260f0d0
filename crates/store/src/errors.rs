use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot encode value of type {kind}: only number, string and boolean are supported")]
    Encode { kind: &'static str },
    #[error("cannot decode stored value {raw:?}")]
    Decode { raw: String },
    #[error("lock on {key:?} in scope {scope:?} not acquired within {timeout:?}")]
    LockTimeout { key: String, scope: String, timeout: Duration },
    #[error("key must not be empty")]
    InvalidKey,
    #[error("backend error: {0}")]
    Backend(String),
    #[error("backend does not support {0}")]
    Unsupported(&'static str),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn decode(raw: &str) -> Self { Self::Decode { raw: raw.to_string() } }

    pub fn backend<E: std::fmt::Display>(err: E) -> Self { Self::Backend(err.to_string()) }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
