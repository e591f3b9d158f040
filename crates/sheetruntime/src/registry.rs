use serde::Serialize;
use sheetcore::{GraphModel, Value};
use std::collections::{BTreeMap, HashMap};

/// Descriptions derived from a prompt are cut to this many characters.
const DESCRIPTION_LIMIT: usize = 100;

/// Read-only metadata for one registered node
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistryEntry {
    pub description: String,
    pub prompt: String,
    pub agent_type: String,
}

/// Read-only metadata index over every node of one compiled graph, built
/// once per graph and shared with dynamic-routing agents at injection
/// time. Entries are keyed by node name in a `BTreeMap`, so iteration
/// order is deterministic.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AgentRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl AgentRegistry {
    /// Derive the registry from a compiled graph. This never fails:
    /// malformed context degrades to a partial entry, not an abort.
    pub fn from_graph(graph: &GraphModel) -> Self {
        let mut entries = BTreeMap::new();
        for node in graph.iter() {
            let context = resolve_context(&node.context);
            let description = context
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| truncate_description(&node.prompt));

            entries.insert(
                node.name.clone(),
                RegistryEntry {
                    description,
                    prompt: node.prompt.clone(),
                    agent_type: node.agent_type.clone(),
                },
            );
        }
        tracing::debug!(graph = graph.name(), entries = entries.len(), "built node registry");
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in node-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegistryEntry)> {
        self.entries.iter()
    }

    /// Node names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Resolve free-form node context into a key/value map. Three attempts,
/// first success wins, the last always succeeds:
/// structured object → `key:value` / `key=value` pairs → whole string as
/// the description.
pub fn resolve_context(context: &Value) -> HashMap<String, Value> {
    match context {
        Value::Object(map) => map.clone(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return HashMap::new();
            }
            if trimmed.starts_with('{') {
                if let Some(map) = parse_json_object(trimmed) {
                    return map;
                }
            }
            if let Some(map) = parse_pairs(trimmed) {
                return map;
            }
            HashMap::from([("description".to_string(), Value::String(trimmed.to_string()))])
        }
        _ => HashMap::new(),
    }
}

fn parse_json_object(raw: &str) -> Option<HashMap<String, Value>> {
    let json: serde_json::Value = serde_json::from_str(raw).ok()?;
    match Value::from(json) {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Comma-separated `key:value` or `key=value` pairs. Every segment has to
/// parse, otherwise the whole attempt is rejected.
fn parse_pairs(raw: &str) -> Option<HashMap<String, Value>> {
    let mut map = HashMap::new();
    for segment in raw.split(',') {
        let (key, value) = segment
            .split_once(':')
            .or_else(|| segment.split_once('='))?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        map.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Some(map)
}

fn truncate_description(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() <= DESCRIPTION_LIMIT {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(DESCRIPTION_LIMIT).collect();
    cut.push('…');
    cut
}
