// File: rusty-forms-orchestrator/src/reset.rs
// Purpose: Re-initialize one field or the whole form

use crate::error::{FormError, Result};
use crate::orchestrator::FormOrchestrator;

impl FormOrchestrator {
    /// Reset a field to its registered state
    ///
    /// Optionally clears the value, calls `init` with the value left in
    /// place, marks the field invalid and notifies observers. The field's
    /// generation advances, so a verdict still in flight for it is dropped
    /// when `discard_stale` is on.
    pub async fn reset_field(&self, name: &str, clear_value: bool) -> Result<()> {
        let init = {
            let store = self.store.read().await;
            let lifecycle = store
                .lifecycle(name)
                .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
            lifecycle.init.clone()
        };

        if clear_value {
            self.values
                .clear(name)
                .await
                .map_err(|e| self.access_error(name, e))?;
        }

        if let Some(init) = init {
            let value = self
                .values
                .get(name)
                .await
                .map_err(|e| self.access_error(name, e))?;
            init(&value);
        }

        let (generation, state) = {
            let mut store = self.store.write().await;
            let generation = store.reset(name)?;
            (generation, store.all())
        };
        self.stats.write().await.resets += 1;

        tracing::debug!(
            form = %self.config.name,
            field = name,
            generation,
            clear_value,
            "Reset field"
        );

        self.bus.notify(&state).await;
        Ok(())
    }

    /// Reset every field in registration order
    ///
    /// Observers are notified once per field, not once for the batch.
    pub async fn reset_all(&self, clear_value: bool) -> Result<()> {
        for name in self.field_names().await {
            self.reset_field(&name, clear_value).await?;
        }
        Ok(())
    }
}
