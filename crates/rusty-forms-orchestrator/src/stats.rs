//! Validation statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters for one orchestrator instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Validation routines started
    pub runs: u64,

    /// Verdicts written to the store
    pub commits: u64,

    /// Committed verdicts that were valid
    pub passed: u64,

    /// Verdicts dropped because the field was reset mid-flight
    pub stale_discards: u64,

    /// Routines that errored, panicked or timed out, plus failed value reads
    pub failures: u64,

    /// Field and aggregate resets
    pub resets: u64,

    /// When the last routine was started
    pub last_run_at: Option<DateTime<Utc>>,
}

impl ValidationStats {
    pub(crate) fn record_run(&mut self) {
        self.runs += 1;
        self.last_run_at = Some(Utc::now());
    }

    pub(crate) fn record_commit(&mut self, valid: bool) {
        self.commits += 1;
        if valid {
            self.passed += 1;
        }
    }

    /// Share of committed verdicts that were valid
    pub fn pass_rate(&self) -> f64 {
        if self.commits == 0 {
            0.0
        } else {
            self.passed as f64 / self.commits as f64
        }
    }

    /// Routines that have not produced a verdict yet
    pub fn in_flight(&self) -> u64 {
        self.runs
            .saturating_sub(self.commits + self.stale_discards)
    }
}
