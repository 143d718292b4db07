//! Field state store
//!
//! Holds per-field validity, the registered lifecycle and a generation
//! counter. The store has no concurrency logic of its own; the orchestrator
//! guards it and decides when to write.

use crate::error::{FormError, Result};
use crate::lifecycle::LifeCycle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Validity of one field inside a [`FormState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub name: String,
    pub valid: bool,
}

/// Snapshot of every field's validity, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub fields: Vec<FieldStatus>,
}

impl FormState {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.valid)
    }

    /// True when every field is valid (vacuously true with no fields)
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.valid)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldStatus> {
        self.fields.iter()
    }

    /// Names of fields that are not currently valid
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.valid)
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), serde_json::Value::Bool(f.valid)))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// A registered field
#[derive(Debug, Clone)]
pub(crate) struct FieldEntry {
    pub name: String,
    pub lifecycle: LifeCycle,
    pub valid: bool,
    pub generation: u64,
}

/// Registry of fields and their validity
#[derive(Debug, Default)]
pub struct FieldStateStore {
    entries: Vec<FieldEntry>,
    index: HashMap<String, usize>,
}

impl FieldStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field at `valid = false`
    ///
    /// Fails without touching the store when the name is taken or the
    /// lifecycle has no validate capability.
    pub fn register(&mut self, name: &str, lifecycle: LifeCycle) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(FormError::DuplicateField(name.to_string()));
        }
        if !lifecycle.has_validate() {
            return Err(FormError::MissingValidateCapability(name.to_string()));
        }

        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(FieldEntry {
            name: name.to_string(),
            lifecycle,
            valid: false,
            generation: 0,
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entry(name).map(|e| e.valid)
    }

    pub fn set(&mut self, name: &str, valid: bool) -> Result<()> {
        let entry = self.entry_mut(name)?;
        entry.valid = valid;
        Ok(())
    }

    /// Write a verdict unless the field was reset after `generation` was read
    ///
    /// Returns whether the write happened. `None` skips the generation check.
    pub fn commit(&mut self, name: &str, valid: bool, generation: Option<u64>) -> Result<bool> {
        let entry = self.entry_mut(name)?;
        if let Some(started_at) = generation {
            if entry.generation != started_at {
                return Ok(false);
            }
        }
        entry.valid = valid;
        Ok(true)
    }

    pub fn generation(&self, name: &str) -> Option<u64> {
        self.entry(name).map(|e| e.generation)
    }

    /// Advance the generation and clear validity
    pub fn reset(&mut self, name: &str) -> Result<u64> {
        let entry = self.entry_mut(name)?;
        entry.generation += 1;
        entry.valid = false;
        Ok(entry.generation)
    }

    pub fn lifecycle(&self, name: &str) -> Option<&LifeCycle> {
        self.entry(name).map(|e| &e.lifecycle)
    }

    /// Field names in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn all(&self) -> FormState {
        FormState {
            fields: self
                .entries
                .iter()
                .map(|e| FieldStatus {
                    name: e.name.clone(),
                    valid: e.valid,
                })
                .collect(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| e.valid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    fn entry(&self, name: &str) -> Option<&FieldEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut FieldEntry> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }
}
