use crate::agent::Agent;
use sheetcore::{AgentError, NodeModel, SheetError};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory trait for creating agent instances
pub trait AgentFactory: Send + Sync {
    /// Create a new instance bound to the given compiled node
    fn create(&self, node: &NodeModel) -> Result<Box<dyn Agent>, AgentError>;

    /// Agent type tag this factory produces
    fn agent_type(&self) -> &str;
}

/// Catalog of available agent types
pub struct AgentCatalog {
    factories: HashMap<String, Arc<dyn AgentFactory>>,
}

impl AgentCatalog {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register an agent factory
    pub fn register(&mut self, factory: Arc<dyn AgentFactory>) {
        let agent_type = factory.agent_type().to_string();
        tracing::info!("Registering agent type: {}", agent_type);
        self.factories.insert(agent_type, factory);
    }

    /// Create an agent instance for a compiled node
    pub fn create(&self, node: &NodeModel) -> Result<Box<dyn Agent>, SheetError> {
        let factory = self
            .factories
            .get(&node.agent_type)
            .ok_or_else(|| SheetError::UnknownAgentType(node.agent_type.clone()))?;

        factory.create(node).map_err(SheetError::from)
    }

    /// All registered agent type tags, sorted
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn contains(&self, agent_type: &str) -> bool {
        self.factories.contains_key(agent_type)
    }
}

impl Default for AgentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
