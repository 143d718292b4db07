// File: rusty-forms-orchestrator/src/executor.rs
// Purpose: Single-field validation and the commit step shared with run_all

use crate::error::{FormError, Result};
use crate::lifecycle::{Validator, Verdict};
use crate::orchestrator::{FieldOutcome, FormOrchestrator};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Message reported when a routine exceeds the configured timeout
pub const TIMEOUT_MESSAGE: &str = "validation timed out";

impl FormOrchestrator {
    /// Validate one field
    ///
    /// Reads the current value, awaits the field's routine, then in order:
    /// commits the verdict, reports it, notifies observers and finally calls
    /// `when_valid` or `when_invalid`. If the field was reset while the
    /// routine ran (and `discard_stale` is on) none of those happen and the
    /// outcome has `committed == false`.
    #[tracing::instrument(skip(self), fields(form = %self.config.name))]
    pub async fn run_one(&self, name: &str) -> Result<FieldOutcome> {
        let (lifecycle, started_at) = {
            let store = self.store.read().await;
            let lifecycle = store
                .lifecycle(name)
                .cloned()
                .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
            (lifecycle, store.generation(name).unwrap_or_default())
        };
        let validator = lifecycle
            .validate
            .clone()
            .ok_or_else(|| FormError::MissingValidateCapability(name.to_string()))?;

        let value = self
            .values
            .get(name)
            .await
            .map_err(|e| self.access_error(name, e))?;

        let verdict = self.invoke(name, validator, &value).await;
        let committed = self.commit(name, &verdict, started_at).await?;

        if committed {
            let hook = if verdict.valid {
                lifecycle.when_valid.as_ref()
            } else {
                lifecycle.when_invalid.as_ref()
            };
            if let Some(hook) = hook {
                hook(&value);
            }
        }

        Ok(FieldOutcome {
            name: name.to_string(),
            valid: verdict.valid,
            message: verdict.message,
            committed,
        })
    }

    /// Await a routine, folding errors, panics and timeouts into a verdict
    pub(crate) async fn invoke(
        &self,
        name: &str,
        validator: Arc<dyn Validator>,
        value: &str,
    ) -> Verdict {
        self.stats.write().await.record_run();

        let routine = AssertUnwindSafe(validator.validate(value)).catch_unwind();
        let outcome = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, routine).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        form = %self.config.name,
                        field = name,
                        timeout_ms = limit.as_millis() as u64,
                        "Validation timed out"
                    );
                    self.stats.write().await.failures += 1;
                    return Verdict::invalid(TIMEOUT_MESSAGE);
                }
            },
            None => routine.await,
        };

        match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                tracing::warn!(form = %self.config.name, field = name, "Validation routine failed: {}", e);
                self.stats.write().await.failures += 1;
                Verdict::invalid(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::warn!(form = %self.config.name, field = name, "Validation routine panicked: {}", message);
                self.stats.write().await.failures += 1;
                Verdict::invalid(message)
            }
        }
    }

    /// Write a verdict, then report it and notify observers
    ///
    /// Returns false, with no side effects, when the verdict is stale.
    pub(crate) async fn commit(&self, name: &str, verdict: &Verdict, started_at: u64) -> Result<bool> {
        let generation = self.config.discard_stale.then_some(started_at);

        let snapshot = {
            let mut store = self.store.write().await;
            if store.commit(name, verdict.valid, generation)? {
                Some(store.all())
            } else {
                None
            }
        };

        let Some(state) = snapshot else {
            self.stats.write().await.stale_discards += 1;
            tracing::debug!(
                form = %self.config.name,
                field = name,
                started_at,
                "Discarded verdict for a field reset mid-flight"
            );
            return Ok(false);
        };

        tracing::debug!(form = %self.config.name, field = name, valid = verdict.valid, "Committed verdict");

        self.reporter.report(name, verdict.valid, &verdict.message);
        self.bus.notify(&state).await;

        // Counted after notify so nothing awaits between the snapshot and notify
        self.stats.write().await.record_commit(verdict.valid);
        Ok(true)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "validation routine panicked".to_string()
    }
}
