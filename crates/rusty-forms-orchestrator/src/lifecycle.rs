//! Field lifecycle: the validation capability and its optional hooks
//!
//! A [`LifeCycle`] is a typed capability record. `validate` is required and
//! is checked when the field is registered; every other slot is optional.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Event name that triggers validation when a field does not set `on`
pub const DEFAULT_TRIGGER: &str = "change";

/// Outcome of a single validation routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// A field's validation routine
///
/// Routines may finish immediately or only after awaiting remote work. The
/// returned future resolves once, which is the whole completion contract.
/// An `Err` is treated as a failed validation for that field.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, value: &str) -> anyhow::Result<Verdict>;
}

/// Validator backed by an async closure
pub struct FnValidator<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Validator for FnValidator<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Verdict>> + Send + 'static,
{
    async fn validate(&self, value: &str) -> anyhow::Result<Verdict> {
        (self.f)(value.to_string()).await
    }
}

/// Wrap an async closure as a [`Validator`]
///
/// # Example
///
/// ```rust,ignore
/// let routine = validator_fn(|value: String| async move {
///     let taken = lookup_username(&value).await?;
///     Ok(if taken {
///         Verdict::invalid("username taken")
///     } else {
///         Verdict::valid("available")
///     })
/// });
/// ```
pub fn validator_fn<F, Fut>(f: F) -> FnValidator<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Verdict>> + Send + 'static,
{
    FnValidator { f }
}

/// Validator backed by a plain function that answers immediately
pub struct SyncValidator<F> {
    f: F,
}

#[async_trait]
impl<F> Validator for SyncValidator<F>
where
    F: Fn(&str) -> Verdict + Send + Sync + 'static,
{
    async fn validate(&self, value: &str) -> anyhow::Result<Verdict> {
        Ok((self.f)(value))
    }
}

pub fn sync_validator<F>(f: F) -> SyncValidator<F>
where
    F: Fn(&str) -> Verdict + Send + Sync + 'static,
{
    SyncValidator { f }
}

/// Hook receiving the field's current value
pub type Hook = Arc<dyn Fn(&str) + Send + Sync>;

/// Input normalization applied by the binding layer
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Capabilities attached to one field
#[derive(Clone, Default)]
pub struct LifeCycle {
    pub(crate) validate: Option<Arc<dyn Validator>>,
    pub(crate) when_valid: Option<Hook>,
    pub(crate) when_invalid: Option<Hook>,
    pub(crate) init: Option<Hook>,
    pub(crate) transform: Option<Transform>,
    pub(crate) on: Option<String>,
}

impl LifeCycle {
    /// Create an empty lifecycle; `validate` must be set before registration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lifecycle with its validation routine set
    pub fn with_validator(validator: impl Validator + 'static) -> Self {
        Self::new().validate(validator)
    }

    pub fn validate(self, validator: impl Validator + 'static) -> Self {
        self.validate_arc(Arc::new(validator))
    }

    /// Share one routine between several fields
    pub fn validate_arc(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Called with the value after a single-field run that passed
    pub fn when_valid(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.when_valid = Some(Arc::new(hook));
        self
    }

    /// Called with the value after a single-field run that failed
    pub fn when_invalid(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.when_invalid = Some(Arc::new(hook));
        self
    }

    /// Called on reset with the value left in place
    pub fn init(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.init = Some(Arc::new(hook));
        self
    }

    pub fn transform(mut self, transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Event name that triggers validation of this field
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.on = Some(event.into());
        self
    }

    pub fn has_validate(&self) -> bool {
        self.validate.is_some()
    }

    pub fn trigger(&self) -> &str {
        self.on.as_deref().unwrap_or(DEFAULT_TRIGGER)
    }

    /// Apply the transform hook, or return the input unchanged
    pub fn apply_transform(&self, raw: &str) -> String {
        match &self.transform {
            Some(transform) => transform(raw),
            None => raw.to_string(),
        }
    }
}

impl fmt::Debug for LifeCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeCycle")
            .field("validate", &self.validate.is_some())
            .field("when_valid", &self.when_valid.is_some())
            .field("when_invalid", &self.when_invalid.is_some())
            .field("init", &self.init.is_some())
            .field("transform", &self.transform.is_some())
            .field("on", &self.trigger())
            .finish()
    }
}
