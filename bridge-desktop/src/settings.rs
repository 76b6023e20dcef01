//! Settings Storage using a JSON file

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON-file-backed settings store implementation
///
/// Keeps the whole key-value map in memory and writes it back as a single
/// JSON object on every mutation. Suited to the handful of keys a signage
/// screen carries (pairing credentials, last accepted playlist).
pub struct JsonFileSettingsStore {
    path: Option<PathBuf>,
    cache: Mutex<HashMap<String, String>>,
}

impl JsonFileSettingsStore {
    /// Open a settings store at the given file path, creating parent
    /// directories as needed.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is
    /// discarded with a warning rather than bricking the screen, and is
    /// rewritten on the next mutation.
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let cache = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(map) => map
                    .into_iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                    .collect(),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Discarding corrupt settings file");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(path = ?path, keys = cache.len(), "Opened settings store");

        Ok(Self {
            path: Some(path),
            cache: Mutex::new(cache),
        })
    }

    /// Create an in-memory settings store (for testing).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn persist(&self, cache: &HashMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let map: Map<String, Value> = cache
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let contents = serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to encode settings: {}", e))
        })?;

        tokio::fs::write(path, contents)
            .await
            .map_err(BridgeError::Io)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.lock().await;
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache).await?;
        debug!(key = key, "Stored setting");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut cache = self.cache.lock().await;
        if cache.remove(key).is_some() {
            self.persist(&cache).await?;
            debug!(key = key, "Deleted setting");
        }
        Ok(())
    }
}
