//! In-memory value backend

use crate::access::ValueAccess;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory field values
///
/// Unset fields read as the empty string. Clones share the same values, so
/// a test or binding layer can keep a handle while the orchestrator owns
/// another.
#[derive(Clone, Default)]
pub struct MemoryValues {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed values from name/value pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Number of fields holding a value
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl ValueAccess for MemoryValues {
    async fn get(&self, name: &str) -> Result<String> {
        let values = self.values.read().await;
        Ok(values.get(name).cloned().unwrap_or_default())
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.remove(name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
