//! Per-(key, scope) mutual exclusion.
//!
//! Each addressable pair gets its own async mutex, created on first use and
//! dropped from the table once nobody holds or waits for it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::errors::{Result, StoreError};
use crate::metrics;
use crate::scope::Scope;

type LockKey = (Scope, String);

#[derive(Clone, Default)]
pub struct KeyLocks {
    table: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
}

/// Held for the duration of a critical section; releases on drop.
pub struct KeyLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
    id: LockKey,
}

impl KeyLocks {
    pub fn new() -> Self { Self::default() }

    /// Acquire the lock for `(key, scope)`, waiting at most `timeout` when one
    /// is given.
    pub async fn acquire(&self, key: &str, scope: &Scope, timeout: Option<Duration>) -> Result<KeyLockGuard> {
        let id: LockKey = (scope.clone(), key.to_string());
        let mutex = self.table.entry(id.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone();

        let started = Instant::now();
        let guard = match timeout {
            Some(limit) => match tokio::time::timeout(limit, mutex.lock_owned()).await {
                Ok(guard) => guard,
                Err(_) => {
                    warn!(key, scope = %scope, timeout_ms = limit.as_millis() as u64, "lock acquisition timed out");
                    metrics::LOCK_TIMEOUTS_TOTAL.inc();
                    self.release_entry(&id);
                    return Err(StoreError::LockTimeout {
                        key: key.to_string(),
                        scope: scope.to_string(),
                        timeout: limit,
                    });
                }
            },
            None => mutex.lock_owned().await,
        };
        metrics::LOCK_WAIT_SECONDS.observe(started.elapsed().as_secs_f64());
        debug!(key, scope = %scope, "lock acquired");

        Ok(KeyLockGuard { guard: Some(guard), table: self.table.clone(), id })
    }

    /// Number of pairs that currently have a lock entry.
    pub fn len(&self) -> usize { self.table.len() }

    pub fn is_empty(&self) -> bool { self.table.is_empty() }

    fn release_entry(&self, id: &LockKey) { remove_if_idle(&self.table, id); }
}

// The table holds one reference; any other holder or waiter keeps the entry.
fn remove_if_idle(table: &DashMap<LockKey, Arc<Mutex<()>>>, id: &LockKey) {
    table.remove_if(id, |_, mutex| Arc::strong_count(mutex) == 1);
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        remove_if_idle(&self.table, &self.id);
    }
}
