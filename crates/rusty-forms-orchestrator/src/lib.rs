//! # rusty-forms-orchestrator
//!
//! Async per-field validation for form-like inputs. Each field registers a
//! validation routine plus optional lifecycle hooks; the orchestrator
//! tracks every field's validity, runs routines on triggers, joins all of
//! them into one verdict and notifies observers of each change.
//!
//! ## Features
//!
//! - **Single-field runs**: commit, report, notify, then `when_valid` /
//!   `when_invalid`
//! - **Fan-out/fan-in**: every routine runs concurrently, the aggregate
//!   resolves exactly once
//! - **Stale verdicts dropped**: a reset during an in-flight run wins
//! - **Declarative rules**: TOML-configured forms with built-in validators
//!
//! ## Example
//!
//! ```rust,ignore
//! use rusty_forms_orchestrator::{
//!     sync_validator, FormOrchestrator, LifeCycle, LogReporter, MemoryValues,
//!     OrchestratorConfig, Verdict,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let values = MemoryValues::with_values([("email", "a@b.com")]);
//!     let form = FormOrchestrator::new(
//!         OrchestratorConfig::new("signup"),
//!         Arc::new(values),
//!         Arc::new(LogReporter),
//!     );
//!
//!     form.register(
//!         "email",
//!         LifeCycle::with_validator(sync_validator(|v| {
//!             if v.contains('@') { Verdict::valid("ok") } else { Verdict::invalid("bad") }
//!         })),
//!     )
//!     .await?;
//!
//!     let valid = form.run_all().await;
//!     assert!(valid);
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod bus;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod report;
pub mod rules;
pub mod stats;
pub mod store;

mod aggregate;
mod executor;
mod reset;

pub use access::{MemoryValues, ValueAccess};
pub use bus::Observer;
pub use config::{FieldConfig, FormTomlConfig, OrchestratorConfig};
pub use error::{FormError, Result};
pub use executor::TIMEOUT_MESSAGE;
pub use lifecycle::{
    sync_validator, validator_fn, FnValidator, LifeCycle, SyncValidator, Validator, Verdict,
    DEFAULT_TRIGGER,
};
pub use orchestrator::{FieldOutcome, FormOrchestrator};
pub use report::{FnReporter, LogReporter, Reporter};
pub use rules::{FieldRules, RuleValidator};
pub use stats::ValidationStats;
pub use store::{FieldStatus, FormState};
