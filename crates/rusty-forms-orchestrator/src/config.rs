// File: rusty-forms-orchestrator/src/config.rs
// Purpose: Orchestrator configuration, runtime and TOML forms

use crate::access::ValueAccess;
use crate::error::{FormError, Result};
use crate::lifecycle::LifeCycle;
use crate::orchestrator::FormOrchestrator;
use crate::report::Reporter;
use crate::rules::FieldRules;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration for a [`FormOrchestrator`]
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Form name, used in log fields
    pub name: String,

    /// Drop verdicts for fields reset while their routine was in flight
    pub discard_stale: bool,

    /// Upper bound on a single routine; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Capacity of the broadcast channel behind `watch()`
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            name: default_form_name(),
            discard_stale: true,
            timeout: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl OrchestratorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Let the last verdict to land win, even after a reset
    pub fn keep_stale(mut self) -> Self {
        self.discard_stale = false;
        self
    }
}

/// TOML form definition
///
/// ```toml
/// [form]
/// name = "signup"
/// timeout_ms = 5000
///
/// [[field]]
/// name = "email"
/// on = "blur"
/// rules = { required = true, email = true }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormTomlConfig {
    #[serde(default)]
    pub form: FormSection,

    #[serde(default, rename = "field")]
    pub fields: Vec<FieldConfig>,
}

/// `[form]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSection {
    #[serde(default = "default_form_name")]
    pub name: String,

    #[serde(default = "default_true")]
    pub discard_stale: bool,

    /// Per-routine timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for FormSection {
    fn default() -> Self {
        Self {
            name: default_form_name(),
            discard_stale: true,
            timeout_ms: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// One `[[field]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    /// Triggering event (defaults to "change")
    #[serde(default)]
    pub on: Option<String>,

    /// Trim surrounding whitespace before the value is stored
    #[serde(default)]
    pub trim: bool,

    #[serde(default)]
    pub rules: FieldRules,
}

impl FieldConfig {
    /// Build the field's lifecycle with its rules as the validator
    pub fn to_lifecycle(&self) -> Result<LifeCycle> {
        let mut lifecycle = LifeCycle::with_validator(self.rules.clone().into_validator()?);

        if let Some(ref event) = self.on {
            lifecycle = lifecycle.on(event.clone());
        }
        if self.trim {
            lifecycle = lifecycle.transform(|raw| raw.trim().to_string());
        }

        Ok(lifecycle)
    }
}

impl FormTomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FormError::Config(e.to_string()))
    }

    /// Load a form definition from a file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form config: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse form config: {}", path.display()))?;
        Ok(config)
    }

    /// Convert TOML config to runtime config
    pub fn to_runtime_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            name: self.form.name.clone(),
            discard_stale: self.form.discard_stale,
            timeout: self.form.timeout_ms.map(Duration::from_millis),
            channel_capacity: self.form.channel_capacity,
        }
    }

    /// Create an orchestrator with every field registered in file order
    ///
    /// All lifecycles are built before anything is registered, so a bad
    /// rule leaves no partially configured form behind.
    pub async fn build(
        &self,
        values: Arc<dyn ValueAccess>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<FormOrchestrator> {
        let lifecycles = self
            .fields
            .iter()
            .map(|field| -> Result<(String, LifeCycle)> {
                Ok((field.name.clone(), field.to_lifecycle()?))
            })
            .collect::<Result<Vec<_>>>()?;

        let orchestrator = FormOrchestrator::new(self.to_runtime_config(), values, reporter);
        for (name, lifecycle) in lifecycles {
            orchestrator.register(&name, lifecycle).await?;
        }

        Ok(orchestrator)
    }
}

// Default values
fn default_form_name() -> String {
    "form".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}
