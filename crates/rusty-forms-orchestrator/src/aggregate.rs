//! Fan-out/fan-in validation of every field

use crate::lifecycle::Verdict;
use crate::orchestrator::FormOrchestrator;
use futures::stream::{FuturesUnordered, StreamExt};

impl FormOrchestrator {
    /// Validate every field concurrently and return the aggregate verdict
    ///
    /// All routines are started together and committed in the order they
    /// finish. Each commit reports and notifies like [`run_one`], but the
    /// `when_valid` / `when_invalid` hooks are not called. The returned
    /// future resolves exactly once, after the last field has been
    /// committed, with the AND of every field's result. With no fields it
    /// resolves to `true`.
    ///
    /// A routine that never finishes keeps this future pending unless a
    /// timeout is configured. A value that cannot be read, a routine error
    /// and a verdict discarded by a reset all count as invalid.
    ///
    /// [`run_one`]: FormOrchestrator::run_one
    #[tracing::instrument(skip(self), fields(form = %self.config.name))]
    pub async fn run_all(&self) -> bool {
        let jobs: Vec<_> = {
            let store = self.store.read().await;
            store
                .entries()
                .iter()
                .map(|e| (e.name.clone(), e.lifecycle.validate.clone(), e.generation))
                .collect()
        };

        let total = jobs.len();
        if total == 0 {
            tracing::debug!("No fields registered, form is vacuously valid");
            return true;
        }

        tracing::trace!(fields = total, "Starting validation fan-out");

        let mut pending = FuturesUnordered::new();
        for (name, validator, started_at) in jobs {
            pending.push(async move {
                let verdict = match (self.values.get(&name).await, validator) {
                    (Ok(value), Some(validator)) => self.invoke(&name, validator, &value).await,
                    (Err(e), _) => {
                        tracing::warn!(
                            field = %name,
                            backend = self.values.name(),
                            "Failed to read value: {}",
                            e
                        );
                        let mut stats = self.stats.write().await;
                        stats.record_run();
                        stats.failures += 1;
                        Verdict::invalid(format!("Failed to read value: {}", e))
                    }
                    (_, None) => Verdict::invalid("no validate capability"),
                };
                (name, started_at, verdict)
            });
        }

        let mut completed = 0;
        let mut all_valid = true;
        while let Some((name, started_at, verdict)) = pending.next().await {
            completed += 1;
            match self.commit(&name, &verdict, started_at).await {
                Ok(true) => all_valid &= verdict.valid,
                // Reset while in flight; the field now reads as invalid
                Ok(false) => all_valid = false,
                Err(e) => {
                    tracing::warn!(field = %name, "Failed to commit verdict: {}", e);
                    all_valid = false;
                }
            }
        }

        debug_assert_eq!(completed, total);
        tracing::debug!(fields = total, valid = all_valid, "Validation fan-in complete");
        all_valid
    }

    /// Callback form of [`run_all`]; `callback` runs exactly once
    ///
    /// [`run_all`]: FormOrchestrator::run_all
    pub async fn run_all_then<F>(&self, callback: F)
    where
        F: FnOnce(bool),
    {
        let valid = self.run_all().await;
        callback(valid);
    }
}
