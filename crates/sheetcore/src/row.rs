use crate::Value;
use serde::{Deserialize, Serialize};

/// One row of a tabular workflow definition, as handed over by the
/// external sheet parser. Column aliasing and cell cleanup happen on the
/// parser's side; a row arriving here is already shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRow {
    /// Graph this row belongs to
    pub graph: String,

    /// Node name, unique within its graph
    pub node: String,

    /// Tag selecting which runnable agent implementation to bind
    pub agent_type: String,

    /// Pipe-delimited input field names
    #[serde(default)]
    pub inputs: String,

    /// Pipe-delimited output field name(s)
    pub outputs: String,

    /// Prompt text handed to the bound agent
    #[serde(default)]
    pub prompt: String,

    /// Free-form context: a mapping, a loosely formatted string, or absent
    #[serde(default)]
    pub context: Option<Value>,

    /// Static successor edge; empty for terminal and dynamic-routing nodes
    #[serde(default)]
    pub successor: Option<String>,

    /// Output validation policy column (`ignore` | `warn` | `error`)
    #[serde(default)]
    pub validation: Option<String>,

    /// Extra per-node configuration; `extra.validation` overrides the column
    #[serde(default)]
    pub extra: Option<Value>,
}

/// Split a pipe-delimited cell, trimming segments and discarding empty ones.
pub fn split_pipe(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
