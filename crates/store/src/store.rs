use std::{collections::BTreeMap, sync::Arc, time::Duration};

use configs::{BackendKind, StoreConfig};
use tracing::{debug, info, warn};

use crate::backend::{JsonFileBackend, MemoryBackend, RawBackend};
use crate::delta::{parse_int_prefix, truncate, IncrementBy};
use crate::errors::{Result, StoreError};
use crate::locks::{KeyLockGuard, KeyLocks};
use crate::metrics;
use crate::scope::Scope;
use crate::value::TypedValue;

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

/// Typed access to a raw backend, with locked read-modify-write operations.
///
/// Clones share the backend and the lock table.
#[derive(Clone)]
pub struct TypedStore {
    backend: Arc<dyn RawBackend>,
    locks: KeyLocks,
    lock_timeout: Option<Duration>,
}

impl TypedStore {
    pub fn new(backend: Arc<dyn RawBackend>) -> Self {
        Self { backend, locks: KeyLocks::new(), lock_timeout: Some(DEFAULT_LOCK_TIMEOUT) }
    }

    /// `None` waits for locks indefinitely.
    pub fn with_lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Build the configured backend and wrap it.
    pub async fn from_config(cfg: &StoreConfig) -> Result<Self> {
        let backend: Arc<dyn RawBackend> = match cfg.backend {
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
            BackendKind::File => Arc::new(JsonFileBackend::open(&cfg.file_path).await?),
        };
        info!(backend = ?cfg.backend, lock_timeout_ms = cfg.lock_timeout_ms, "typed store ready");
        Ok(Self::new(backend).with_lock_timeout(cfg.lock_timeout()))
    }

    pub fn backend(&self) -> &Arc<dyn RawBackend> { &self.backend }

    pub fn lock_timeout(&self) -> Option<Duration> { self.lock_timeout }

    /// Read and decode a value. Malformed stored data is an error.
    pub async fn get(&self, key: &str, scope: &Scope) -> Result<Option<TypedValue>> {
        check_key(key)?;
        match self.backend.raw_get(key, scope).await? {
            Some(raw) => TypedValue::decode(&raw).map_err(|e| {
                metrics::DECODE_ERRORS_TOTAL.inc();
                warn!(key, scope = %scope, error = %e, "stored value is not decodable");
                e
            }),
            None => Ok(None),
        }
    }

    /// Store a value; `None` removes the key.
    pub async fn set(&self, key: &str, value: Option<TypedValue>, scope: &Scope) -> Result<()> {
        check_key(key)?;
        match value {
            Some(value) => self.write(key, &value, scope).await,
            None => self.remove(key, scope).await,
        }
    }

    /// Store a dynamically typed value. `null` removes the key; arrays and
    /// objects are rejected.
    pub async fn set_json(&self, key: &str, value: serde_json::Value, scope: &Scope) -> Result<()> {
        check_key(key)?;
        if value.is_null() {
            return self.remove(key, scope).await;
        }
        let value = TypedValue::try_from(value)?;
        self.write(key, &value, scope).await
    }

    pub async fn unset(&self, key: &str, scope: &Scope) -> Result<()> {
        check_key(key)?;
        self.remove(key, scope).await
    }

    pub async fn is_set(&self, key: &str, scope: &Scope) -> Result<bool> {
        check_key(key)?;
        Ok(self.backend.raw_get(key, scope).await?.is_some_and(|raw| !raw.is_empty()))
    }

    /// Add `delta` to the number stored under `(key, scope)` and return the
    /// result.
    ///
    /// Numbers are truncated toward zero and strings read by their leading
    /// integer before adding. A missing, boolean, non-numeric or undecodable
    /// current value is replaced by `delta` itself. Arithmetic saturates at
    /// the `i64` bounds.
    pub async fn increment<D: IncrementBy>(&self, key: &str, delta: D, scope: &Scope) -> Result<i64> {
        let delta = delta.to_delta();
        let mut next = delta;

        self.update(key, scope, |current| {
            match current.as_ref().and_then(integer_base) {
                Some(base) => next = base.saturating_add(delta),
                None if current.is_some() => {
                    metrics::INCREMENT_RESETS_TOTAL.inc();
                    debug!(key, scope = %scope, delta, "current value is not numeric; resetting to delta");
                }
                None => {}
            }
            Some(TypedValue::from(next))
        })
        .await?;

        metrics::INCREMENTS_TOTAL.inc();
        debug!(key, scope = %scope, delta, value = next, "incremented");
        Ok(next)
    }

    /// Run `f` on the current value under the `(key, scope)` lock and store
    /// what it returns (`None` removes the key).
    ///
    /// `f` sees `None` when nothing is stored or the stored value cannot be
    /// decoded.
    pub async fn update<F>(&self, key: &str, scope: &Scope, f: F) -> Result<Option<TypedValue>>
    where
        F: FnOnce(Option<TypedValue>) -> Option<TypedValue> + Send,
    {
        check_key(key)?;
        let _guard = self.lock(key, scope).await?;
        let current = self.read_lenient(key, scope).await?;
        let next = f(current);
        match &next {
            Some(value) => self.write(key, value, scope).await?,
            None => self.remove(key, scope).await?,
        }
        Ok(next)
    }

    /// Decoded entries of a scope whose keys start with `prefix`, in key
    /// order. An empty prefix selects everything; entries that cannot be
    /// decoded are left out.
    pub async fn dump(&self, scope: &Scope, prefix: &str) -> Result<BTreeMap<String, TypedValue>> {
        let mut out = BTreeMap::new();
        for (key, raw) in self.backend.raw_entries(scope).await? {
            if !key.starts_with(prefix) {
                continue;
            }
            match TypedValue::decode(&raw) {
                Ok(Some(value)) => {
                    out.insert(key, value);
                }
                Ok(None) => {}
                Err(e) => {
                    metrics::DECODE_ERRORS_TOTAL.inc();
                    warn!(key = %key, scope = %scope, error = %e, "skipping undecodable entry in dump");
                }
            }
        }
        Ok(out)
    }

    /// [`dump`](Self::dump) rendered as a JSON object.
    pub async fn dump_json(&self, scope: &Scope, prefix: &str) -> Result<String> {
        let entries = self.dump(scope, prefix).await?;
        Ok(serde_json::to_string(&entries)?)
    }

    async fn lock(&self, key: &str, scope: &Scope) -> Result<KeyLockGuard> {
        self.locks.acquire(key, scope, self.lock_timeout).await
    }

    // Decode failures count as "nothing stored"; backend failures still surface.
    async fn read_lenient(&self, key: &str, scope: &Scope) -> Result<Option<TypedValue>> {
        let Some(raw) = self.backend.raw_get(key, scope).await? else {
            return Ok(None);
        };
        match TypedValue::decode(&raw) {
            Err(StoreError::Decode { raw }) => {
                warn!(key, scope = %scope, raw = %raw, "discarding undecodable value");
                Ok(None)
            }
            other => other,
        }
    }

    async fn write(&self, key: &str, value: &TypedValue, scope: &Scope) -> Result<()> {
        self.backend.raw_set(key, value.encode(), scope).await
    }

    async fn remove(&self, key: &str, scope: &Scope) -> Result<()> {
        self.backend.raw_unset(key, scope).await
    }
}

// Integer an increment builds on, if the current value has one.
fn integer_base(value: &TypedValue) -> Option<i64> {
    match value {
        TypedValue::Number(n) => truncate(*n),
        TypedValue::String(s) => parse_int_prefix(s),
        TypedValue::Boolean(_) => None,
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey);
    }
    Ok(())
}
