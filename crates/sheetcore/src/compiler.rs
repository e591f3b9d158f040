use crate::error::CompileError;
use crate::graph::{GraphModel, NodeModel};
use crate::row::{split_pipe, SheetRow};
use crate::spec::{OutputSpec, ValidationPolicy};
use crate::Value;
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

/// Compile every graph named in `rows`. Compilation is all-or-nothing per
/// graph: one bad row poisons its graph's result and leaves the others
/// untouched.
pub fn compile_rows(rows: &[SheetRow]) -> HashMap<String, Result<GraphModel, CompileError>> {
    let mut graph_names: Vec<&str> = Vec::new();
    for row in rows {
        if !graph_names.contains(&row.graph.as_str()) {
            graph_names.push(&row.graph);
        }
    }

    graph_names
        .into_iter()
        .map(|name| (name.to_string(), compile_graph(name, rows)))
        .collect()
}

/// Compile one named graph out of a row set.
pub fn compile_graph(name: &str, rows: &[SheetRow]) -> Result<GraphModel, CompileError> {
    let mut nodes: HashMap<String, NodeModel> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for row in rows.iter().filter(|row| row.graph == name) {
        if nodes.contains_key(row.node.trim()) {
            return Err(CompileError::DuplicateNode {
                graph: name.to_string(),
                node: row.node.trim().to_string(),
            });
        }
        let node = compile_node(row)?;
        order.push(node.name.clone());
        nodes.insert(node.name.clone(), node);
    }

    if order.is_empty() {
        return Err(CompileError::EmptyGraph {
            graph: name.to_string(),
        });
    }

    validate_edges(name, &nodes, &order)?;

    tracing::debug!(graph = name, nodes = order.len(), "compiled graph");
    Ok(GraphModel::new(name.to_string(), nodes, order))
}

fn compile_node(row: &SheetRow) -> Result<NodeModel, CompileError> {
    let outputs = OutputSpec::parse(&row.outputs, &row.node)?;
    let policy = resolve_policy(row)?;
    let successor = row
        .successor
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(NodeModel {
        name: row.node.trim().to_string(),
        agent_type: row.agent_type.trim().to_string(),
        prompt: row.prompt.clone(),
        context: row.context.clone().unwrap_or(Value::Null),
        inputs: split_pipe(&row.inputs),
        outputs,
        successor,
        policy,
        extra: row.extra.clone().unwrap_or(Value::Null),
    })
}

/// Policy resolution order: `extra.validation` beats the sheet column,
/// which beats the `warn` default.
fn resolve_policy(row: &SheetRow) -> Result<ValidationPolicy, CompileError> {
    let from_extra = row
        .extra
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|map| map.get("validation"))
        .and_then(Value::as_str);

    let raw = from_extra.or(row.validation.as_deref());
    match raw {
        None => Ok(ValidationPolicy::default()),
        Some(cell) if cell.trim().is_empty() => Ok(ValidationPolicy::default()),
        Some(cell) => cell.parse().map_err(|value| CompileError::InvalidPolicy {
            node: row.node.clone(),
            value,
        }),
    }
}

/// Check successor edges against the node map and reject cycles formed by
/// static edges alone. A static cycle can never terminate: every node in it
/// has a wired successor, so no router can break the loop. Cycles routed
/// through an orchestrator are fine — those nodes carry no static edge and
/// never appear in this graph.
fn validate_edges(
    graph_name: &str,
    nodes: &HashMap<String, NodeModel>,
    order: &[String],
) -> Result<(), CompileError> {
    let mut digraph = DiGraph::<&str, ()>::new();
    let mut index_of = HashMap::new();

    for name in order {
        let idx = digraph.add_node(name.as_str());
        index_of.insert(name.as_str(), idx);
    }

    for name in order {
        let node = &nodes[name];
        if let Some(successor) = &node.successor {
            let to = index_of.get(successor.as_str()).ok_or_else(|| {
                CompileError::UnknownSuccessor {
                    graph: graph_name.to_string(),
                    node: name.clone(),
                    successor: successor.clone(),
                }
            })?;
            digraph.add_edge(index_of[name.as_str()], *to, ());
        }
    }

    if let Err(cycle) = toposort(&digraph, None) {
        let node = digraph
            .node_weight(cycle.node_id())
            .map(|n| n.to_string())
            .unwrap_or_default();
        return Err(CompileError::StaticCycle {
            graph: graph_name.to_string(),
            node,
        });
    }

    Ok(())
}
