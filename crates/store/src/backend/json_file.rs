use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::RawBackend;
use crate::errors::{Result, StoreError};
use crate::scope::Scope;

type ScopedMap = BTreeMap<Scope, BTreeMap<String, String>>;

/// JSON file-backed raw store.
///
/// Keeps a `scope -> key -> raw value` document in memory and rewrites the
/// whole file after every mutation. Meant for small amounts of state shared
/// across restarts, not for high write rates.
#[derive(Clone)]
pub struct JsonFileBackend {
    inner: Arc<RwLock<ScopedMap>>,
    file_path: PathBuf,
}

impl JsonFileBackend {
    /// Open the document at `path`, creating it (and its parent directory)
    /// when missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: ScopedMap = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => ScopedMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::backend)?,
            Err(_) => {
                let empty = ScopedMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(StoreError::backend)?)
                    .await
                    .map_err(StoreError::backend)?;
                empty
            }
        };
        debug!(path = %file_path.display(), scopes = map.len(), "opened json file backend");

        Ok(Self { inner: Arc::new(RwLock::new(map)), file_path })
    }

    pub fn path(&self) -> &PathBuf { &self.file_path }

    // Called with the write guard held so file contents follow mutation order.
    // Callers commit `map` to memory only after this succeeds.
    async fn save(&self, map: &ScopedMap) -> Result<()> {
        let data = serde_json::to_vec(map).map_err(StoreError::backend)?;
        fs::write(&self.file_path, data).await.map_err(StoreError::backend)?;
        Ok(())
    }
}

#[async_trait]
impl RawBackend for JsonFileBackend {
    async fn raw_get(&self, key: &str, scope: &Scope) -> Result<Option<String>> {
        let map = self.inner.read().await;
        Ok(map.get(scope).and_then(|vars| vars.get(key)).cloned())
    }

    async fn raw_set(&self, key: &str, value: String, scope: &Scope) -> Result<()> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.entry(scope.clone()).or_default().insert(key.to_string(), value);
        self.save(&next).await?;
        *map = next;
        Ok(())
    }

    async fn raw_unset(&self, key: &str, scope: &Scope) -> Result<()> {
        let mut map = self.inner.write().await;
        if !map.get(scope).is_some_and(|vars| vars.contains_key(key)) {
            return Ok(());
        }
        let mut next = map.clone();
        if let Some(vars) = next.get_mut(scope) {
            vars.remove(key);
            if vars.is_empty() {
                next.remove(scope);
            }
        }
        self.save(&next).await?;
        *map = next;
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
