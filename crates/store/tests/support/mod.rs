#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use store::{MemoryBackend, RawBackend, Result, Scope};

/// Yields to the scheduler around every raw call so that unsynchronized
/// read-modify-write sequences interleave.
#[derive(Clone, Default)]
pub struct YieldingBackend {
    pub inner: MemoryBackend,
}

#[async_trait]
impl RawBackend for YieldingBackend {
    async fn raw_get(&self, key: &str, scope: &Scope) -> Result<Option<String>> {
        tokio::task::yield_now().await;
        let v = self.inner.raw_get(key, scope).await;
        tokio::task::yield_now().await;
        v
    }

    async fn raw_set(&self, key: &str, value: String, scope: &Scope) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.raw_set(key, value, scope).await
    }

    async fn raw_unset(&self, key: &str, scope: &Scope) -> Result<()> {
        self.inner.raw_unset(key, scope).await
    }
}

/// Sleeps before every read, keeping a locked increment busy for `delay`.
#[derive(Clone)]
pub struct SlowBackend {
    pub inner: MemoryBackend,
    pub delay: Duration,
}

#[async_trait]
impl RawBackend for SlowBackend {
    async fn raw_get(&self, key: &str, scope: &Scope) -> Result<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.raw_get(key, scope).await
    }

    async fn raw_set(&self, key: &str, value: String, scope: &Scope) -> Result<()> {
        self.inner.raw_set(key, value, scope).await
    }

    async fn raw_unset(&self, key: &str, scope: &Scope) -> Result<()> {
        self.inner.raw_unset(key, scope).await
    }
}

pub fn temp_file(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
}
