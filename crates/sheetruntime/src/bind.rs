use crate::agent::Agent;
use crate::catalog::AgentCatalog;
use sheetcore::{GraphModel, Result};
use std::collections::HashMap;

/// A compiled graph with every node bound to a runnable agent instance
pub struct ExecutableGraph {
    model: GraphModel,
    units: HashMap<String, Box<dyn Agent>>,
}

impl ExecutableGraph {
    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn unit(&self, name: &str) -> Option<&dyn Agent> {
        self.units.get(name).map(|unit| unit.as_ref())
    }

    /// Enumerate `(name, unit)` pairs in sheet row order
    pub fn units(&self) -> impl Iterator<Item = (&str, &dyn Agent)> {
        self.model
            .names()
            .filter_map(|name| self.units.get(name).map(|unit| (name, unit.as_ref())))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Bind every node of a compiled graph to an agent instance from the
/// catalog. Fails on the first node whose agent type is unregistered.
pub fn bind(model: GraphModel, catalog: &AgentCatalog) -> Result<ExecutableGraph> {
    let mut units: HashMap<String, Box<dyn Agent>> = HashMap::new();

    for node in model.iter() {
        let unit = catalog.create(node)?;
        tracing::debug!(node = %node.name, agent_type = %node.agent_type, "bound agent");
        units.insert(node.name.clone(), unit);
    }

    Ok(ExecutableGraph { model, units })
}
