//! Value access collaborators
//!
//! The orchestrator never stores field values itself. It reads and writes
//! them through a [`ValueAccess`] implementation supplied by the binding
//! layer.

use anyhow::Result;
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryValues;

/// Trait for field value backends
#[async_trait]
pub trait ValueAccess: Send + Sync {
    /// Get the current value of a field
    async fn get(&self, name: &str) -> Result<String>;

    /// Overwrite the value of a field
    async fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Clear a field's value
    async fn clear(&self, name: &str) -> Result<()> {
        self.set(name, "").await
    }

    /// Backend name, recorded on value access failures
    fn name(&self) -> &'static str;
}
