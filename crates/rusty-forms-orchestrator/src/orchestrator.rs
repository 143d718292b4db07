//! Form orchestrator - owns one form's fields, observers and collaborators
//!
//! Validation is split across three files that all extend
//! [`FormOrchestrator`]: `executor.rs` (single field), `aggregate.rs`
//! (every field at once) and `reset.rs`.

use crate::access::ValueAccess;
use crate::bus::{ChangeBus, Observer};
use crate::config::OrchestratorConfig;
use crate::error::{FormError, Result};
use crate::lifecycle::LifeCycle;
use crate::report::Reporter;
use crate::stats::ValidationStats;
use crate::store::{FieldStateStore, FormState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Result of one single-field validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub name: String,
    pub valid: bool,
    pub message: String,

    /// False when the verdict arrived after a reset and was dropped
    pub committed: bool,
}

/// Per-form validation orchestrator
///
/// Every instance owns its own store and observers; nothing is shared
/// between forms. Clones are handles to the same form.
pub struct FormOrchestrator {
    pub(crate) id: Uuid,
    pub(crate) config: OrchestratorConfig,
    pub(crate) store: Arc<RwLock<FieldStateStore>>,
    pub(crate) bus: Arc<ChangeBus>,
    pub(crate) values: Arc<dyn ValueAccess>,
    pub(crate) reporter: Arc<dyn Reporter>,
    pub(crate) stats: Arc<RwLock<ValidationStats>>,
}

impl std::fmt::Debug for FormOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOrchestrator")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FormOrchestrator {
    /// Create an orchestrator with no fields
    pub fn new(
        config: OrchestratorConfig,
        values: Arc<dyn ValueAccess>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let bus = ChangeBus::new(config.channel_capacity);

        Self {
            id: Uuid::new_v4(),
            config,
            store: Arc::new(RwLock::new(FieldStateStore::new())),
            bus: Arc::new(bus),
            values,
            reporter,
            stats: Arc::new(RwLock::new(ValidationStats::default())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Register a field
    ///
    /// The field starts invalid. Duplicate names and lifecycles without a
    /// validate capability are rejected and nothing is stored.
    pub async fn register(&self, name: &str, lifecycle: LifeCycle) -> Result<()> {
        let mut store = self.store.write().await;
        store.register(name, lifecycle)?;

        tracing::debug!(
            form = %self.config.name,
            field = name,
            fields = store.len(),
            "Registered field"
        );
        Ok(())
    }

    /// Observe every validity change
    ///
    /// Observers run synchronously, in subscription order, with a snapshot
    /// taken at the moment of the change. A failing observer is logged and
    /// the remaining observers still run.
    pub async fn subscribe<F>(&self, observer: F) -> usize
    where
        F: Fn(&FormState) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        self.bus.subscribe(observer).await
    }

    /// Receive form snapshots on a broadcast channel
    pub fn watch(&self) -> broadcast::Receiver<FormState> {
        self.bus.watch()
    }

    /// Aggregate verdict from stored state, without running anything
    pub async fn is_valid(&self) -> bool {
        self.store.read().await.is_valid()
    }

    /// Stored validity of one field
    pub async fn state(&self, name: &str) -> Result<bool> {
        self.store
            .read()
            .await
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub async fn snapshot(&self) -> FormState {
        self.store.read().await.all()
    }

    /// Field names in registration order
    pub async fn field_names(&self) -> Vec<String> {
        self.store.read().await.names()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Apply a field's transform hook to raw input
    ///
    /// For the binding layer, before it writes the value through
    /// [`ValueAccess`]. Identity when the field has no transform.
    pub async fn transform(&self, name: &str, raw: &str) -> Result<String> {
        let store = self.store.read().await;
        let lifecycle = store
            .lifecycle(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        Ok(lifecycle.apply_transform(raw))
    }

    /// Validate a field if `event` is the one it is bound to
    ///
    /// Returns `Ok(None)` when the event does not trigger this field.
    pub async fn dispatch(&self, name: &str, event: &str) -> Result<Option<FieldOutcome>> {
        let triggered = {
            let store = self.store.read().await;
            let lifecycle = store
                .lifecycle(name)
                .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
            lifecycle.trigger() == event
        };

        if !triggered {
            tracing::trace!(form = %self.config.name, field = name, event, "Event ignored");
            return Ok(None);
        }

        self.run_one(name).await.map(Some)
    }

    /// Get validation statistics
    pub async fn stats(&self) -> ValidationStats {
        self.stats.read().await.clone()
    }

    pub(crate) fn access_error(&self, name: &str, source: anyhow::Error) -> FormError {
        tracing::warn!(
            form = %self.config.name,
            field = name,
            backend = self.values.name(),
            "Value access failed: {}",
            source
        );
        FormError::Access {
            field: name.to_string(),
            source,
        }
    }
}

impl Clone for FormOrchestrator {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            bus: Arc::clone(&self.bus),
            values: Arc::clone(&self.values),
            reporter: Arc::clone(&self.reporter),
            stats: Arc::clone(&self.stats),
        }
    }
}
