// File: rusty-forms-orchestrator/src/error.rs
// Purpose: Error taxonomy for form registration and validation triggers

/// Errors raised by the orchestrator
///
/// Configuration errors (`DuplicateField`, `MissingValidateCapability`,
/// `UnknownField`, `Config`) are raised synchronously and leave the
/// orchestrator untouched.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Field already registered: {0}")]
    DuplicateField(String),

    #[error("Field '{0}' has no validate capability")]
    MissingValidateCapability(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Value access failed for field '{field}': {source}")]
    Access {
        field: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FormError {
    /// Whether this error comes from setup rather than from a collaborator
    pub fn is_config_error(&self) -> bool {
        !matches!(self, FormError::Access { .. })
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
