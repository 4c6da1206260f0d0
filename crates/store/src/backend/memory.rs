use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RawBackend;
use crate::errors::Result;
use crate::scope::Scope;

type ScopedMap = BTreeMap<Scope, BTreeMap<String, String>>;

/// Process-local backend keeping every scope in memory.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<ScopedMap>>,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Number of keys stored in a scope.
    pub async fn len(&self, scope: &Scope) -> usize {
        let map = self.inner.read().await;
        map.get(scope).map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, scope: &Scope) -> bool { self.len(scope).await == 0 }
}

#[async_trait]
impl RawBackend for MemoryBackend {
    async fn raw_get(&self, key: &str, scope: &Scope) -> Result<Option<String>> {
        let map = self.inner.read().await;
        Ok(map.get(scope).and_then(|vars| vars.get(key)).cloned())
    }

    async fn raw_set(&self, key: &str, value: String, scope: &Scope) -> Result<()> {
        let mut map = self.inner.write().await;
        map.entry(scope.clone()).or_default().insert(key.to_string(), value);
        Ok(())
    }

    async fn raw_unset(&self, key: &str, scope: &Scope) -> Result<()> {
        let mut map = self.inner.write().await;
        if let Some(vars) = map.get_mut(scope) {
            vars.remove(key);
            if vars.is_empty() {
                map.remove(scope);
            }
        }
        Ok(())
    }

    async fn raw_entries(&self, scope: &Scope) -> Result<Vec<(String, String)>> {
        let map = self.inner.read().await;
        Ok(map
            .get(scope)
            .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}
