use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State field the runner reads to find a dynamic successor
pub const NEXT_NODE_FIELD: &str = "next_node";
/// State field carrying the router's confidence
pub const CONFIDENCE_FIELD: &str = "confidence";
/// State field carrying the router's free-text rationale
pub const RATIONALE_FIELD: &str = "rationale";

/// Decision produced by a dynamic-routing node: which node runs next,
/// how sure the classifier was, and why. Ephemeral — consumed immediately
/// to pick the next hop, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingDecision {
    pub selected: String,
    pub confidence: f64,
    pub rationale: String,
}

impl RoutingDecision {
    /// Spread the decision over the router's output fields so the regular
    /// contract merge carries it into workflow state.
    pub fn into_fields(self) -> HashMap<String, Value> {
        HashMap::from([
            (NEXT_NODE_FIELD.to_string(), Value::String(self.selected)),
            (CONFIDENCE_FIELD.to_string(), Value::Number(self.confidence)),
            (RATIONALE_FIELD.to_string(), Value::String(self.rationale)),
        ])
    }

    /// Read a decision back out of a merged turn delta, if one is present.
    pub fn from_fields(fields: &HashMap<String, Value>) -> Option<Self> {
        let selected = fields.get(NEXT_NODE_FIELD)?.as_str()?.to_string();
        Some(Self {
            selected,
            confidence: fields
                .get(CONFIDENCE_FIELD)
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            rationale: fields
                .get(RATIONALE_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}
