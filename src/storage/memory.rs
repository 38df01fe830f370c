//! In-process backend. Nothing outlives the process.

use crate::{core::store::StateBackend, errors::Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Backend holding values in a map, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with `value` already stored under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let slots = HashMap::from([(key.to_string(), value.to_string())]);
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Current value under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.slots.read().await.get(key).cloned()
    }
}

impl StateBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
