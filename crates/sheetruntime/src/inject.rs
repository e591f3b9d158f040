use crate::agent::{Agent, RegistrySlot};
use crate::bind::ExecutableGraph;
use crate::registry::AgentRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Locate a unit's registry slot, unwrapping at most one wrapper layer.
fn slot_of(unit: &dyn Agent) -> Option<&RegistrySlot> {
    unit.registry_slot()
        .or_else(|| unit.underlying().and_then(|inner| inner.registry_slot()))
}

/// Attach `registry` to every routing-capable unit in the executable
/// graph. Returns the number of units injected. Must run to completion
/// before the graph is handed to a runner.
pub fn inject_registry(graph: &ExecutableGraph, registry: &Arc<AgentRegistry>) -> usize {
    if registry.is_empty() {
        tracing::info!(graph = graph.model().name(), "registry is empty, skipping injection");
        return 0;
    }

    let mut injected = 0;
    for (name, unit) in graph.units() {
        let Some(slot) = slot_of(unit) else {
            continue;
        };
        if slot.attach(Arc::clone(registry)) {
            tracing::debug!(node = name, "attached node registry");
            injected += 1;
        } else {
            tracing::debug!(node = name, "registry already attached");
        }
    }

    if injected == 0 {
        tracing::debug!(
            graph = graph.model().name(),
            "no routing-capable nodes, nothing to inject"
        );
    } else {
        tracing::info!(
            graph = graph.model().name(),
            injected,
            "node registry injected"
        );
    }
    injected
}

/// Diagnostic check: for each routing-capable node, report whether a
/// non-empty registry is attached. Not used for control flow.
pub fn verify_injection(graph: &ExecutableGraph) -> BTreeMap<String, bool> {
    graph
        .units()
        .filter_map(|(name, unit)| {
            slot_of(unit).map(|slot| {
                let ok = slot.get().map(|r| !r.is_empty()).unwrap_or(false);
                (name.to_string(), ok)
            })
        })
        .collect()
}
