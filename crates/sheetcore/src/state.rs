use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shared state mutated by successive node turns. Fields are inserted or
/// overwritten, never removed.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    fields: HashMap<String, Value>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Apply a fully reconciled delta in one step. A turn's merge goes
    /// through here so no reader ever observes a partial merge.
    pub fn apply(&mut self, delta: HashMap<String, Value>) {
        self.fields.extend(delta);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }
}
