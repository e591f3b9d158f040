use async_trait::async_trait;
use sheetcore::{AgentError, NodeModel, Value};
use sheetruntime::{Agent, AgentContext, AgentFactory};

/// Gathers the node's inputs into a single mapping result, one key per
/// declared input field that is present in state.
pub struct CollectAgent;

#[async_trait]
impl Agent for CollectAgent {
    fn agent_type(&self) -> &str {
        "work.collect"
    }

    async fn execute(&self, ctx: AgentContext) -> Result<Value, AgentError> {
        Ok(Value::Object(ctx.inputs.clone()))
    }
}

pub struct CollectAgentFactory;

impl AgentFactory for CollectAgentFactory {
    fn create(&self, _node: &NodeModel) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(CollectAgent))
    }

    fn agent_type(&self) -> &str {
        "work.collect"
    }
}
