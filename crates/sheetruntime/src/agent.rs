use crate::registry::AgentRegistry;
use async_trait::async_trait;
use sheetcore::{AgentError, NodeModel, Value};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Runnable unit bound to one compiled node
#[async_trait]
pub trait Agent: Send + Sync {
    /// Type tag this agent was registered under (e.g. "work.template")
    fn agent_type(&self) -> &str;

    /// Execute one turn. The returned value is reconciled against the
    /// node's output contract before anything reaches workflow state.
    async fn execute(&self, ctx: AgentContext) -> Result<Value, AgentError>;

    /// Registry attachment slot. Only routing-capable agents expose one;
    /// the injector treats `Some` as "this unit takes a node registry".
    fn registry_slot(&self) -> Option<&RegistrySlot> {
        None
    }

    /// For wrappers: the agent one layer underneath. The injector unwraps
    /// exactly one layer through this before giving up on a unit.
    fn underlying(&self) -> Option<&dyn Agent> {
        None
    }
}

/// Execution context for one node turn
#[derive(Clone)]
pub struct AgentContext {
    /// The compiled node this unit is bound to
    pub node: NodeModel,

    /// Values of the node's declared input fields, read from workflow state
    pub inputs: HashMap<String, Value>,
}

impl AgentContext {
    pub fn new(node: NodeModel, inputs: HashMap<String, Value>) -> Self {
        Self { node, inputs }
    }

    /// Get required input or return error
    pub fn require_input(&self, name: &str) -> Result<&Value, AgentError> {
        self.inputs
            .get(name)
            .ok_or_else(|| AgentError::MissingInput(name.to_string()))
    }

    /// Get input with default
    pub fn input_or(&self, name: &str, default: Value) -> Value {
        self.inputs.get(name).cloned().unwrap_or(default)
    }
}

/// Attachment slot through which the injector hands a routing agent its
/// node registry. Write-once: the first attach wins, later ones are
/// ignored, and the agent only ever sees an immutable view.
#[derive(Default)]
pub struct RegistrySlot {
    inner: OnceLock<Arc<AgentRegistry>>,
}

impl RegistrySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a registry. Returns false if one was already attached.
    pub fn attach(&self, registry: Arc<AgentRegistry>) -> bool {
        self.inner.set(registry).is_ok()
    }

    pub fn get(&self) -> Option<&Arc<AgentRegistry>> {
        self.inner.get()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// Adapter that wraps any agent with per-turn timing logs. Also the
/// canonical example of a unit the injector has to unwrap to reach a
/// routing instance.
pub struct InstrumentedAgent {
    inner: Box<dyn Agent>,
}

impl InstrumentedAgent {
    pub fn new(inner: Box<dyn Agent>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Agent for InstrumentedAgent {
    fn agent_type(&self) -> &str {
        self.inner.agent_type()
    }

    async fn execute(&self, ctx: AgentContext) -> Result<Value, AgentError> {
        let node = ctx.node.name.clone();
        let start = Instant::now();
        let result = self.inner.execute(ctx).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::debug!(node = %node, elapsed_ms, "agent turn completed"),
            Err(e) => tracing::debug!(node = %node, elapsed_ms, error = %e, "agent turn failed"),
        }
        result
    }

    fn underlying(&self) -> Option<&dyn Agent> {
        Some(self.inner.as_ref())
    }
}
