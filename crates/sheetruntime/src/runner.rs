use crate::agent::AgentContext;
use crate::bind::ExecutableGraph;
use chrono::Utc;
use sheetcore::{
    reconcile, EventBus, RoutingDecision, RunEvent, RunId, SheetError, Value, WorkflowState,
};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Sequential graph runner: one node turn at a time, a single writer to
/// workflow state. Starts at the entry node, follows static successors,
/// and follows routing decisions where a node carries no static edge.
pub struct GraphRunner {
    max_hops: usize,
}

impl GraphRunner {
    pub fn new(max_hops: usize) -> Self {
        Self { max_hops }
    }

    pub async fn run(
        &self,
        graph: &ExecutableGraph,
        bus: &EventBus,
        initial: HashMap<String, Value>,
    ) -> Result<RunOutcome, SheetError> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        bus.emit(RunEvent::RunStarted {
            run_id,
            graph: graph.model().name().to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(run_id = %run_id, graph = graph.model().name(), "run started");

        let result = self.run_inner(graph, bus, run_id, initial).await;

        bus.emit(RunEvent::RunCompleted {
            run_id,
            success: result.is_ok(),
            hops: result.as_ref().map(|outcome| outcome.hops).unwrap_or(0),
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        });

        result
    }

    async fn run_inner(
        &self,
        graph: &ExecutableGraph,
        bus: &EventBus,
        run_id: RunId,
        initial: HashMap<String, Value>,
    ) -> Result<RunOutcome, SheetError> {
        let model = graph.model();
        let mut state = WorkflowState::new();
        state.apply(initial);

        let mut current = model
            .entry()
            .map(|node| node.name.clone())
            .ok_or_else(|| SheetError::Execution(format!("graph '{}' is empty", model.name())))?;
        let mut hops = 0;

        loop {
            if hops >= self.max_hops {
                return Err(SheetError::Execution(format!(
                    "hop limit {} reached at node '{}'",
                    self.max_hops, current
                )));
            }
            hops += 1;

            let node = model
                .node(&current)
                .ok_or_else(|| SheetError::Execution(format!("node '{}' not in graph", current)))?;
            let unit = graph
                .unit(&current)
                .ok_or_else(|| SheetError::Execution(format!("node '{}' has no bound agent", current)))?;

            // Inputs are the node's declared fields read from current state;
            // absent fields are simply not passed, the agent decides whether
            // that is fatal.
            let inputs: HashMap<String, Value> = node
                .inputs
                .iter()
                .filter_map(|field| state.get(field).map(|value| (field.clone(), value.clone())))
                .collect();

            bus.emit(RunEvent::NodeStarted {
                run_id,
                node: node.name.clone(),
                agent_type: node.agent_type.clone(),
                timestamp: Utc::now(),
            });

            let turn_start = Instant::now();
            let produced = match unit.execute(AgentContext::new(node.clone(), inputs)).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!(node = %node.name, error = %e, "agent turn failed");
                    bus.emit(RunEvent::NodeFailed {
                        run_id,
                        node: node.name.clone(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    return Err(e.into());
                }
            };

            let delta = match reconcile(&node.name, &node.outputs, node.policy, produced) {
                Ok(delta) => delta,
                Err(e) => {
                    tracing::error!(node = %node.name, error = %e, "output contract violation");
                    bus.emit(RunEvent::NodeFailed {
                        run_id,
                        node: node.name.clone(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    return Err(e.into());
                }
            };

            state.apply(delta.clone());
            bus.emit(RunEvent::NodeCompleted {
                run_id,
                node: node.name.clone(),
                merged: delta.clone(),
                duration_ms: turn_start.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
            });

            match &node.successor {
                Some(successor) => current = successor.clone(),
                None => match RoutingDecision::from_fields(&delta) {
                    Some(decision) => {
                        if !model.contains(&decision.selected) {
                            return Err(SheetError::Execution(format!(
                                "routing decision selected unknown node '{}'",
                                decision.selected
                            )));
                        }
                        bus.emit(RunEvent::RouteChosen {
                            run_id,
                            node: node.name.clone(),
                            selected: decision.selected.clone(),
                            confidence: decision.confidence,
                            rationale: decision.rationale.clone(),
                            timestamp: Utc::now(),
                        });
                        tracing::info!(
                            node = %node.name,
                            selected = %decision.selected,
                            confidence = decision.confidence,
                            "route chosen"
                        );
                        current = decision.selected;
                    }
                    // no static edge, no decision: terminal node
                    None => {
                        return Ok(RunOutcome {
                            run_id,
                            state,
                            hops,
                            last_node: node.name.clone(),
                        });
                    }
                },
            }
        }
    }
}

impl Default for GraphRunner {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Result of one graph run
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub state: WorkflowState,
    pub hops: usize,
    pub last_node: String,
}
